//! Reading and writing values inside a JSON document by field path.

use crate::error::{PathError, PathResult};
use crate::fieldpath::{FieldPath, Segment};
use crate::merge::merge_value;
use patchform_types::patch::ToFieldPathPolicy;
use serde_json::{Map, Value};

fn describe(path: &FieldPath) -> String {
    if path.is_root() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

/// Look up the value at `path`.
///
/// Missing fields, out-of-range indices and `null` intermediates are
/// `NotFound`; descending into a scalar is a `TypeMismatch`.
pub fn get<'a>(doc: &'a Value, path: &FieldPath) -> PathResult<&'a Value> {
    let mut cur = doc;
    for (i, seg) in path.segments().iter().enumerate() {
        cur = match (seg, cur) {
            (Segment::Wildcard, _) => {
                return Err(PathError::Wildcard {
                    path: path.to_string(),
                });
            }
            (_, Value::Null) => {
                return Err(PathError::NotFound {
                    path: describe(&path.prefix(i + 1)),
                });
            }
            (Segment::Field(name), Value::Object(map)) => {
                map.get(name).ok_or_else(|| PathError::NotFound {
                    path: describe(&path.prefix(i + 1)),
                })?
            }
            (Segment::Field(_), _) => {
                return Err(PathError::TypeMismatch {
                    path: describe(&path.prefix(i)),
                    expected: "not an object",
                });
            }
            (Segment::Index(idx), Value::Array(items)) => {
                items.get(*idx).ok_or_else(|| PathError::NotFound {
                    path: describe(&path.prefix(i + 1)),
                })?
            }
            (Segment::Index(_), _) => {
                return Err(PathError::TypeMismatch {
                    path: describe(&path.prefix(i)),
                    expected: "not an array",
                });
            }
        };
    }
    Ok(cur)
}

/// Parse `path` and look it up.
pub fn get_path<'a>(doc: &'a Value, path: &str) -> PathResult<&'a Value> {
    get(doc, &FieldPath::parse(path)?)
}

/// Write `value` at `path`, replacing whatever was there.
pub fn set(doc: &mut Value, path: &FieldPath, value: Value) -> PathResult<()> {
    let slot = slot_mut(doc, path)?;
    *slot = value;
    Ok(())
}

/// Write `value` at `path` following a merge policy.
pub fn set_with(
    doc: &mut Value,
    path: &FieldPath,
    value: Value,
    policy: ToFieldPathPolicy,
) -> PathResult<()> {
    if !policy.is_merge() {
        return set(doc, path, value);
    }
    let slot = slot_mut(doc, path)?;
    merge_value(slot, value, policy);
    Ok(())
}

/// Walk to `path`, creating missing objects and arrays on the way. Arrays
/// too short for an index are padded with `null`.
fn slot_mut<'a>(doc: &'a mut Value, path: &FieldPath) -> PathResult<&'a mut Value> {
    let mut cur = doc;
    for (i, seg) in path.segments().iter().enumerate() {
        match seg {
            Segment::Field(name) => {
                if cur.is_null() {
                    *cur = Value::Object(Map::new());
                }
                let Value::Object(map) = cur else {
                    return Err(PathError::TypeMismatch {
                        path: describe(&path.prefix(i)),
                        expected: "not an object",
                    });
                };
                cur = map.entry(name.clone()).or_insert(Value::Null);
            }
            Segment::Index(idx) => {
                if cur.is_null() {
                    *cur = Value::Array(Vec::new());
                }
                let Value::Array(items) = cur else {
                    return Err(PathError::TypeMismatch {
                        path: describe(&path.prefix(i)),
                        expected: "not an array",
                    });
                };
                if items.len() <= *idx {
                    items.resize(idx + 1, Value::Null);
                }
                cur = &mut items[*idx];
            }
            Segment::Wildcard => {
                return Err(PathError::Wildcard {
                    path: path.to_string(),
                });
            }
        }
    }
    Ok(cur)
}

/// Expand every `[*]` in `path` against `doc`.
///
/// Arrays expand to their indices and objects to their keys in sorted order.
/// Branches that do not exist are dropped; an empty result is an error.
/// A path without wildcards expands to itself.
pub fn expand_wildcards(doc: &Value, path: &FieldPath) -> PathResult<Vec<FieldPath>> {
    if !path.has_wildcard() {
        return Ok(vec![path.clone()]);
    }

    let mut expanded: Vec<Vec<Segment>> = vec![Vec::new()];
    for seg in path.segments() {
        if !matches!(seg, Segment::Wildcard) {
            for prefix in expanded.iter_mut() {
                prefix.push(seg.clone());
            }
            continue;
        }

        let mut next = Vec::new();
        for prefix in expanded {
            let at = FieldPath::from_segments(prefix.clone());
            match get(doc, &at) {
                Ok(Value::Array(items)) => {
                    for idx in 0..items.len() {
                        let mut p = prefix.clone();
                        p.push(Segment::Index(idx));
                        next.push(p);
                    }
                }
                Ok(Value::Object(map)) => {
                    let mut keys: Vec<&String> = map.keys().collect();
                    keys.sort();
                    for key in keys {
                        let mut p = prefix.clone();
                        p.push(Segment::Field(key.clone()));
                        next.push(p);
                    }
                }
                Ok(Value::Null) => {}
                Ok(_) => {
                    return Err(PathError::TypeMismatch {
                        path: describe(&at),
                        expected: "wildcard applied to a scalar",
                    });
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        expanded = next;
    }

    if expanded.is_empty() {
        return Err(PathError::NoExpansion {
            path: path.to_string(),
        });
    }
    Ok(expanded.into_iter().map(FieldPath::from_segments).collect())
}
