//! Combine several source values into one.

use crate::error::{TransformError, TransformResult};
use crate::format::sprintf;
use patchform_types::patch::{Combine, CombineStrategy};
use serde_json::Value;

/// Check that a combine block can run.
pub fn validate(c: &Combine) -> TransformResult<()> {
    if c.variables.is_empty() {
        return Err(TransformError::NoVariables);
    }
    match c.strategy {
        CombineStrategy::String => c.string.as_ref().map(|_| ()).ok_or(TransformError::MissingConfig {
            kind: "combine",
            field: "string",
        }),
    }
}

/// Merge the variables' values, in declared order, into one value.
pub fn resolve(c: &Combine, values: &[Value]) -> TransformResult<Value> {
    validate(c)?;
    match c.strategy {
        CombineStrategy::String => {
            let fmt = c
                .string
                .as_ref()
                .map(|s| s.fmt.as_str())
                .unwrap_or_default();
            Ok(Value::String(sprintf(fmt, values)))
        }
    }
}
