//! Arithmetic on numeric values. Integer inputs stay integers and float
//! inputs stay floats.

use crate::error::{TransformError, TransformResult};
use crate::value::{as_int, float_value, kind_name};
use patchform_types::transform::{MathTransform, MathTransformType};
use serde_json::Value;

fn operand(m: &MathTransform) -> TransformResult<i64> {
    let (value, field) = match m.kind {
        MathTransformType::Multiply => (m.multiply, "multiply"),
        MathTransformType::ClampMin => (m.clamp_min, "clampMin"),
        MathTransformType::ClampMax => (m.clamp_max, "clampMax"),
    };
    value.ok_or(TransformError::MissingConfig { kind: "math", field })
}

/// Check that the operand for the selected operation is present.
pub fn validate(m: &MathTransform) -> TransformResult<()> {
    operand(m).map(|_| ())
}

pub fn resolve(m: &MathTransform, input: Value) -> TransformResult<Value> {
    let Value::Number(n) = &input else {
        return Err(TransformError::InputType {
            op: "math",
            expected: "numeric",
            got: kind_name(&input),
        });
    };
    let k = operand(m)?;

    if let Some(i) = as_int(n) {
        let out = match m.kind {
            MathTransformType::Multiply => i
                .checked_mul(k)
                .ok_or(TransformError::Overflow { op: "multiply" })?,
            MathTransformType::ClampMin => i.max(k),
            MathTransformType::ClampMax => i.min(k),
        };
        return Ok(Value::from(out));
    }

    let f = n.as_f64().ok_or(TransformError::InputType {
        op: "math",
        expected: "numeric",
        got: "number",
    })?;
    let bound = k as f64;
    match m.kind {
        MathTransformType::Multiply => float_value("multiply", f * bound),
        MathTransformType::ClampMin if f < bound => float_value("clampMin", bound),
        MathTransformType::ClampMax if f > bound => float_value("clampMax", bound),
        _ => Ok(input),
    }
}
