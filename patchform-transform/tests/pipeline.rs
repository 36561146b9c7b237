use patchform_transform::{TransformError, resolve_pipeline, validate};
use patchform_types::transform::{
    ConvertTarget, MatchPattern, MatchTransform, MathTransform, StringConversion,
    StringTransform, Transform, TransformType,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::collections::BTreeMap;

fn multiply(k: i64) -> Transform {
    Transform::math(MathTransform {
        multiply: Some(k),
        ..Default::default()
    })
}

#[test]
fn convert_then_multiply() {
    let pipeline = vec![Transform::convert(ConvertTarget::Int64, None), multiply(3)];
    assert_eq!(resolve_pipeline(&pipeline, json!("10")).expect("pipeline"), json!(30));
}

#[test]
fn empty_pipeline_is_identity() {
    assert_eq!(resolve_pipeline(&[], json!({"a": 1})).expect("noop"), json!({"a": 1}));
}

#[test]
fn failure_names_the_step() {
    let pipeline = vec![
        Transform::string(StringTransform::conversion(StringConversion::ToUpper)),
        multiply(2),
    ];
    let err = resolve_pipeline(&pipeline, json!("abc")).expect_err("math on string");
    match &err {
        TransformError::AtIndex { index, source } => {
            assert_eq!(*index, 1);
            assert!(matches!(**source, TransformError::InputType { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().starts_with("transform at index 1:"));
    assert!(matches!(err.root(), TransformError::InputType { .. }));
}

#[test]
fn match_then_map() {
    let pipeline = vec![
        Transform::matching(MatchTransform {
            patterns: vec![MatchPattern::regexp("^eu-", json!("europe"))],
            fallback_value: Some(json!("elsewhere")),
            ..Default::default()
        }),
        Transform::map(BTreeMap::from([
            ("europe".to_string(), json!("eu-central-1")),
            ("elsewhere".to_string(), json!("us-east-1")),
        ])),
    ];
    assert_eq!(
        resolve_pipeline(&pipeline, json!("eu-west")).expect("eu"),
        json!("eu-central-1")
    );
    assert_eq!(
        resolve_pipeline(&pipeline, json!("ap-south")).expect("fallback"),
        json!("us-east-1")
    );
}

#[test]
fn match_without_fallback_yields_null() {
    let pipeline = vec![Transform::matching(MatchTransform {
        patterns: vec![MatchPattern::literal("foo", json!("bar"))],
        ..Default::default()
    })];
    assert_eq!(resolve_pipeline(&pipeline, json!("foo")).expect("hit"), json!("bar"));
    assert_eq!(resolve_pipeline(&pipeline, json!("baz")).expect("miss"), Value::Null);
}

#[test]
fn missing_sub_object_is_reported() {
    let t = Transform {
        kind: TransformType::Math,
        ..Transform::map(BTreeMap::new())
    };
    let err = validate(&t).expect_err("math without math block");
    assert_eq!(err.to_string(), "math transform requires math");
}
