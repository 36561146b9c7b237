//! Type conversion between document value kinds.

use crate::error::{TransformError, TransformResult};
use crate::quantity::parse_quantity;
use crate::value::{as_int, float_value, format_float, kind_name};
use patchform_types::transform::{ConvertTarget, ConvertTransform};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    String,
    Int64,
    Float64,
    Bool,
    Object,
    Array,
}

impl Kind {
    fn of(v: &Value) -> Option<Kind> {
        match v {
            Value::String(_) => Some(Kind::String),
            Value::Number(n) if as_int(n).is_some() => Some(Kind::Int64),
            Value::Number(_) => Some(Kind::Float64),
            Value::Bool(_) => Some(Kind::Bool),
            Value::Object(_) => Some(Kind::Object),
            Value::Array(_) => Some(Kind::Array),
            Value::Null => None,
        }
    }

    fn target(t: ConvertTarget) -> Kind {
        match t {
            ConvertTarget::String => Kind::String,
            ConvertTarget::Int | ConvertTarget::Int64 => Kind::Int64,
            ConvertTarget::Float64 => Kind::Float64,
            ConvertTarget::Bool => Kind::Bool,
            ConvertTarget::Object => Kind::Object,
            ConvertTarget::Array => Kind::Array,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Int64 => "int64",
            Kind::Float64 => "float64",
            Kind::Bool => "bool",
            Kind::Object => "object",
            Kind::Array => "array",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    None,
    Quantity,
    Json,
}

impl Format {
    fn parse(raw: Option<&str>) -> TransformResult<Format> {
        match raw {
            None | Some("") | Some("none") => Ok(Format::None),
            Some("quantity") => Ok(Format::Quantity),
            Some("json") => Ok(Format::Json),
            Some(other) => Err(TransformError::UnknownFormat(other.to_string())),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Format::None => "none",
            Format::Quantity => "quantity",
            Format::Json => "json",
        }
    }
}

/// Check that a convert transform names a known format.
pub fn validate(c: &ConvertTransform) -> TransformResult<()> {
    Format::parse(c.format.as_deref()).map(|_| ())
}

pub fn resolve(c: &ConvertTransform, input: Value) -> TransformResult<Value> {
    let from = Kind::of(&input).ok_or(TransformError::InputType {
        op: "convert",
        expected: "non-null",
        got: kind_name(&input),
    })?;
    let to = Kind::target(c.to_type);
    if from == to {
        return Ok(input);
    }
    let format = Format::parse(c.format.as_deref())?;

    let unsupported = || TransformError::UnsupportedConversion {
        from: from.name(),
        to: to.name(),
        format: format.name(),
    };

    match (input, to, format) {
        (Value::String(s), Kind::Int64, Format::None) => s
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| parse_error(&s, "int64", e)),
        (Value::String(s), Kind::Float64, Format::None) => {
            let f = s
                .parse::<f64>()
                .map_err(|e| parse_error(&s, "float64", e))?;
            float_value("convert", f)
        }
        (Value::String(s), Kind::Float64, Format::Quantity) => {
            float_value("convert", parse_quantity(&s)?)
        }
        (Value::String(s), Kind::Bool, Format::None) => parse_bool(&s).map(Value::Bool),
        (Value::String(s), Kind::Object | Kind::Array, Format::Json) => {
            let parsed: Value = serde_json::from_str(&s)?;
            if Kind::of(&parsed) == Some(to) {
                Ok(parsed)
            } else {
                Err(TransformError::Parse {
                    input: s,
                    target: to.name(),
                    reason: format!("decoded JSON is {}", kind_name(&parsed)),
                })
            }
        }
        (Value::Number(n), to, Format::None) if from == Kind::Int64 => {
            let i = as_int(&n).ok_or_else(unsupported)?;
            match to {
                Kind::String => Ok(Value::String(i.to_string())),
                Kind::Bool => Ok(Value::Bool(i == 1)),
                Kind::Float64 => float_value("convert", i as f64),
                _ => Err(unsupported()),
            }
        }
        (Value::Number(n), to, Format::None) => {
            let f = n.as_f64().ok_or_else(unsupported)?;
            match to {
                Kind::String => Ok(Value::String(format_float(f))),
                Kind::Bool => Ok(Value::Bool(f == 1.0)),
                Kind::Int64 => Ok(Value::from(f as i64)),
                _ => Err(unsupported()),
            }
        }
        (Value::Bool(b), Kind::String, Format::None) => Ok(Value::String(b.to_string())),
        (Value::Bool(b), Kind::Int64, Format::None) => Ok(Value::from(i64::from(b))),
        (Value::Bool(b), Kind::Float64, Format::None) => {
            float_value("convert", if b { 1.0 } else { 0.0 })
        }
        (v @ (Value::Object(_) | Value::Array(_)), Kind::String, Format::Json) => {
            Ok(Value::String(serde_json::to_string(&v)?))
        }
        _ => Err(unsupported()),
    }
}

fn parse_error(input: &str, target: &'static str, e: impl std::fmt::Display) -> TransformError {
    TransformError::Parse {
        input: input.to_string(),
        target,
        reason: e.to_string(),
    }
}

fn parse_bool(s: &str) -> TransformResult<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(parse_error(s, "bool", "not a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conv(to: ConvertTarget, format: Option<&str>, input: Value) -> TransformResult<Value> {
        resolve(
            &ConvertTransform {
                to_type: to,
                format: format.map(str::to_string),
            },
            input,
        )
    }

    #[test]
    fn string_to_numbers() {
        assert_eq!(conv(ConvertTarget::Int64, None, json!("10")).expect("int"), json!(10));
        assert_eq!(conv(ConvertTarget::Int, None, json!("-3")).expect("int"), json!(-3));
        assert_eq!(
            conv(ConvertTarget::Float64, None, json!("2.5")).expect("float"),
            json!(2.5)
        );
        assert!(conv(ConvertTarget::Int64, None, json!("ten")).is_err());
    }

    #[test]
    fn surrounding_whitespace_is_not_a_number() {
        assert!(conv(ConvertTarget::Int64, None, json!(" 10")).is_err());
        assert!(conv(ConvertTarget::Int, None, json!("10\n")).is_err());
        assert!(conv(ConvertTarget::Float64, None, json!(" 2.5 ")).is_err());
    }

    #[test]
    fn quantity_format() {
        assert_eq!(
            conv(ConvertTarget::Float64, Some("quantity"), json!("1000m")).expect("quantity"),
            json!(1.0)
        );
    }

    #[test]
    fn json_format() {
        assert_eq!(
            conv(ConvertTarget::Object, Some("json"), json!(r#"{"a":1}"#)).expect("object"),
            json!({"a": 1})
        );
        assert_eq!(
            conv(ConvertTarget::String, Some("json"), json!(["a", 1])).expect("string"),
            json!(r#"["a",1]"#)
        );
        assert!(conv(ConvertTarget::Array, Some("json"), json!(r#"{"a":1}"#)).is_err());
    }

    #[test]
    fn numbers_to_bool_are_true_only_for_one() {
        assert_eq!(conv(ConvertTarget::Bool, None, json!(1)).expect("bool"), json!(true));
        assert_eq!(conv(ConvertTarget::Bool, None, json!(2)).expect("bool"), json!(false));
        assert_eq!(conv(ConvertTarget::Bool, None, json!(1.0)).expect("bool"), json!(true));
        assert_eq!(conv(ConvertTarget::Bool, None, json!(0.5)).expect("bool"), json!(false));
    }

    #[test]
    fn numeric_widths() {
        assert_eq!(conv(ConvertTarget::Float64, None, json!(3)).expect("f"), json!(3.0));
        assert_eq!(conv(ConvertTarget::Int64, None, json!(3.9)).expect("i"), json!(3));
        assert_eq!(conv(ConvertTarget::String, None, json!(2.5)).expect("s"), json!("2.5"));
        assert_eq!(conv(ConvertTarget::String, None, json!(7)).expect("s"), json!("7"));
    }

    #[test]
    fn bools_convert_out() {
        assert_eq!(conv(ConvertTarget::String, None, json!(true)).expect("s"), json!("true"));
        assert_eq!(conv(ConvertTarget::Int64, None, json!(true)).expect("i"), json!(1));
        assert_eq!(conv(ConvertTarget::Float64, None, json!(false)).expect("f"), json!(0.0));
        assert_eq!(conv(ConvertTarget::Bool, None, json!("False")).expect("b"), json!(false));
    }

    #[test]
    fn same_type_ignores_format() {
        assert_eq!(
            conv(ConvertTarget::String, Some("bogus"), json!("x")).expect("noop"),
            json!("x")
        );
    }

    #[test]
    fn unknown_format_is_an_error() {
        let err = conv(ConvertTarget::Int64, Some("bogus"), json!("1")).expect_err("format");
        assert!(matches!(err, TransformError::UnknownFormat(_)));
    }

    #[test]
    fn unsupported_triples_are_errors() {
        let err = conv(ConvertTarget::Object, None, json!("{}")).expect_err("needs json");
        assert!(matches!(err, TransformError::UnsupportedConversion { .. }));
        let err = conv(ConvertTarget::Array, None, json!(3)).expect_err("int to array");
        assert!(matches!(err, TransformError::UnsupportedConversion { .. }));
        assert!(conv(ConvertTarget::String, None, json!(null)).is_err());
    }
}
