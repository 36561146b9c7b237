//! Merge policy for writes that do not simply replace the target.
//!
//! At the written location itself incoming objects merge into existing
//! objects and everything else replaces the target, except that
//! array-onto-array appends under an `AppendArrays` policy. Below that level
//! existing keys win unless the policy forces overwrites.

use patchform_types::patch::ToFieldPathPolicy;
use serde_json::Value;

/// Merge `src` into `dst` following `policy`.
///
/// `Replace` simply overwrites.
pub fn merge_value(dst: &mut Value, src: Value, policy: ToFieldPathPolicy) {
    if !policy.is_merge() {
        *dst = src;
        return;
    }
    match (&mut *dst, src) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) if !slot.is_null() => merge_nested(slot, value, policy),
                    _ => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(existing), Value::Array(incoming)) if policy.appends_arrays() => {
            append_unique(existing, incoming);
        }
        (slot, src) => *slot = src,
    }
}

fn merge_nested(dst: &mut Value, src: Value, policy: ToFieldPathPolicy) {
    match (&mut *dst, src) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) if !slot.is_null() => merge_nested(slot, value, policy),
                    _ => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(existing), Value::Array(incoming)) if policy.appends_arrays() => {
            append_unique(existing, incoming);
        }
        (slot, src) => {
            if policy.overwrites() {
                *slot = src;
            }
        }
    }
}

/// Concatenate and drop repeated scalars, keeping the first occurrence.
/// Objects and arrays are never deduplicated.
fn append_unique(existing: &mut Vec<Value>, incoming: Vec<Value>) {
    existing.extend(incoming);
    let mut seen: Vec<Value> = Vec::new();
    existing.retain(|v| {
        if v.is_object() || v.is_array() {
            return true;
        }
        if seen.contains(v) {
            false
        } else {
            seen.push(v.clone());
            true
        }
    });
}
