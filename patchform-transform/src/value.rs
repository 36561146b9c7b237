//! Helpers shared by the transforms for inspecting and rendering values.

use crate::error::{TransformError, TransformResult};
use serde_json::{Number, Value};

/// Short type name used in error messages and `%!verb(type=...)` output.
pub fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float64",
        Value::Number(_) => "int64",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Wrap a float, rejecting NaN and infinities which JSON cannot carry.
pub fn float_value(op: &'static str, value: f64) -> TransformResult<Value> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or(TransformError::NotFinite { op, value })
}

/// Integer view of a number, if it is one.
pub fn as_int(n: &Number) -> Option<i64> {
    if n.is_f64() { None } else { n.as_i64() }
}

/// Render a float the way `%v` does: shortest representation, switching to
/// exponent form for very large or very small magnitudes.
pub fn format_float(f: f64) -> String {
    let abs = f.abs();
    if abs != 0.0 && !(1e-4..1e21).contains(&abs) {
        let raw = format!("{f:e}");
        return match raw.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(d) => ('-', d),
                    None => ('+', exp),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => raw,
        };
    }
    format!("{f}")
}

/// Plain-text rendering of any value. Strings are emitted raw, containers as
/// compact JSON.
pub fn render(v: &Value) -> String {
    match v {
        Value::Null => "<nil>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match as_int(n) {
            Some(i) => i.to_string(),
            None => n.as_f64().map(format_float).unwrap_or_else(|| n.to_string()),
        },
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_names_keep_number_width() {
        assert_eq!(kind_name(&json!(3)), "int64");
        assert_eq!(kind_name(&json!(3.0)), "float64");
        assert_eq!(kind_name(&json!(null)), "null");
    }

    #[test]
    fn floats_render_like_percent_v() {
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(3.0), "3");
        assert_eq!(format_float(1e21), "1e+21");
        assert_eq!(format_float(0.00001), "1e-05");
    }

    #[test]
    fn render_values() {
        assert_eq!(render(&json!("a b")), "a b");
        assert_eq!(render(&json!(42)), "42");
        assert_eq!(render(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(render(&json!(null)), "<nil>");
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        assert!(float_value("math", f64::NAN).is_err());
        assert_eq!(float_value("math", 2.5).expect("finite"), json!(2.5));
    }
}
