#![no_main]

//! Transform pipelines built from structured input.

use libfuzzer_sys::fuzz_target;
use patchform_types::transform::{
    ConvertTarget, MathTransform, MathTransformType, StringConversion, StringTransform,
    StringTransformType, Transform,
};
use serde_json::Value;

#[derive(Debug, arbitrary::Arbitrary)]
enum Input {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<Input> for Value {
    fn from(i: Input) -> Self {
        match i {
            Input::Null => Value::Null,
            Input::Bool(b) => Value::Bool(b),
            Input::Int(n) => Value::from(n),
            Input::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
            Input::Str(s) => Value::String(s),
        }
    }
}

const TARGETS: [ConvertTarget; 7] = [
    ConvertTarget::String,
    ConvertTarget::Int,
    ConvertTarget::Int64,
    ConvertTarget::Bool,
    ConvertTarget::Float64,
    ConvertTarget::Object,
    ConvertTarget::Array,
];

#[derive(Debug, arbitrary::Arbitrary)]
enum Step {
    Multiply(i64),
    ClampMin(i64),
    ClampMax(i64),
    Convert(u8, bool),
    Format(String),
    Upper,
    Base64,
    Sha256,
    Adler32,
}

impl Step {
    fn build(self) -> Transform {
        match self {
            Step::Multiply(n) => math(MathTransformType::Multiply, n),
            Step::ClampMin(n) => math(MathTransformType::ClampMin, n),
            Step::ClampMax(n) => math(MathTransformType::ClampMax, n),
            Step::Convert(target, quantity) => {
                let to = TARGETS[usize::from(target) % TARGETS.len()];
                Transform::convert(to, quantity.then_some("quantity"))
            }
            Step::Format(fmt) => Transform::string(StringTransform {
                kind: StringTransformType::Format,
                fmt: Some(fmt),
                ..Default::default()
            }),
            Step::Upper => conversion(StringConversion::ToUpper),
            Step::Base64 => conversion(StringConversion::ToBase64),
            Step::Sha256 => conversion(StringConversion::ToSha256),
            Step::Adler32 => conversion(StringConversion::ToAdler32),
        }
    }
}

fn math(kind: MathTransformType, n: i64) -> Transform {
    let mut m = MathTransform {
        kind,
        ..Default::default()
    };
    match kind {
        MathTransformType::Multiply => m.multiply = Some(n),
        MathTransformType::ClampMin => m.clamp_min = Some(n),
        MathTransformType::ClampMax => m.clamp_max = Some(n),
    }
    Transform::math(m)
}

fn conversion(c: StringConversion) -> Transform {
    Transform::string(StringTransform {
        kind: StringTransformType::Convert,
        convert: Some(c),
        ..Default::default()
    })
}

#[derive(Debug, arbitrary::Arbitrary)]
struct Pipeline {
    input: Input,
    steps: Vec<Step>,
}

fuzz_target!(|p: Pipeline| {
    let transforms: Vec<Transform> = p.steps.into_iter().map(Step::build).collect();
    for t in &transforms {
        let _ = patchform_transform::validate(t);
    }
    let _ = patchform_transform::resolve_pipeline(&transforms, p.input.into());
});
