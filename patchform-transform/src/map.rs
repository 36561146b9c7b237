//! Static key/value lookup.

use crate::error::{TransformError, TransformResult};
use crate::value::kind_name;
use patchform_types::transform::MapTransform;
use serde_json::Value;

/// Look the input string up in a static table.
pub fn resolve(m: &MapTransform, input: Value) -> TransformResult<Value> {
    let Value::String(key) = &input else {
        return Err(TransformError::InputType {
            op: "map",
            expected: "string",
            got: kind_name(&input),
        });
    };
    m.pairs
        .get(key)
        .cloned()
        .ok_or_else(|| TransformError::MapKeyMissing(key.clone()))
}
