//! Field-path addressing for JSON documents.
//!
//! Responsibilities:
//! - Parse field paths (`spec.items[0].name`, `metadata.labels[a.b/c]`, `list[*]`).
//! - Read values, distinguishing missing data from shape errors.
//! - Write values, creating intermediates and honouring merge policies.
//! - Expand wildcard paths against a concrete document.

pub mod error;
pub mod fieldpath;
pub mod merge;
pub mod paved;

pub use error::{PathError, PathResult};
pub use fieldpath::{FieldPath, Segment};
pub use merge::merge_value;
pub use paved::{expand_wildcards, get, get_path, set, set_with};

use patchform_types::patch::ToFieldPathPolicy;
use serde_json::Value;

/// Write `value` at every concrete path `path` expands to in `doc`.
///
/// Returns how many locations were written.
pub fn set_expanded(
    doc: &mut Value,
    path: &FieldPath,
    value: Value,
    policy: ToFieldPathPolicy,
) -> PathResult<usize> {
    let targets = expand_wildcards(doc, path)?;
    let count = targets.len();
    for target in targets {
        tracing::trace!(path = %target, "write");
        set_with(doc, &target, value.clone(), policy)?;
    }
    Ok(count)
}
