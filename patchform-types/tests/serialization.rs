use patchform_types::checks::{ConnectionDetailType, ReadinessCheckType};
use patchform_types::envelope::{Ready, RunRequest, RunResponse, State};
use patchform_types::input::Resources;
use patchform_types::patch::{CombineStrategy, PatchType, ToFieldPathPolicy};
use patchform_types::transform::{
    ConvertTarget, MatchFallbackTo, MatchPatternType, StringConversion, StringTransformType,
    TransformType,
};
use pretty_assertions::assert_eq;

const INPUT_YAML: &str = r#"
resources:
  - name: bucket
    base:
      apiVersion: s3.example.org/v1
      kind: Bucket
      spec:
        forProvider:
          region: us-east-1
    patches:
      - type: PatchSet
        patchSetName: common
      - type: FromCompositeFieldPath
        fromFieldPath: spec.widgets
        toFieldPath: spec.forProvider.watchers
        transforms:
          - type: convert
            convert:
              toType: int64
          - type: math
            math:
              multiply: 3
      - type: CombineFromComposite
        combine:
          variables:
            - fromFieldPath: spec.a
            - fromFieldPath: spec.b
          strategy: string
          string:
            fmt: "%s-%s"
        toFieldPath: metadata.name
        policy:
          toFieldPath: MergeObjectsAppendArrays
    connectionDetails:
      - name: endpoint
        type: FromFieldPath
        fromFieldPath: status.atProvider.endpoint
    readinessChecks:
      - type: MatchString
        fieldPath: status.atProvider.state
        matchString: Available
patchSets:
  - name: common
    patches:
      - type: FromCompositeFieldPath
        fromFieldPath: metadata.labels
        transforms:
          - type: match
            match:
              patterns:
                - type: literal
                  literal: foo
                  result: bar
              fallbackTo: Input
          - type: string
            string:
              type: Convert
              convert: ToUpper
"#;

#[test]
fn input_yaml_deserializes() {
    let input: Resources = serde_yaml::from_str(INPUT_YAML).expect("parse input");
    assert_eq!(input.resources.len(), 1);

    let t = &input.resources[0];
    assert_eq!(t.name, "bucket");
    assert_eq!(t.base.as_ref().expect("base")["kind"], "Bucket");
    assert_eq!(t.patches.len(), 3);
    assert_eq!(t.patches[0].kind, PatchType::PatchSet);
    assert_eq!(t.patches[0].patch_set_name.as_deref(), Some("common"));

    let p = &t.patches[1];
    assert_eq!(p.transforms.len(), 2);
    assert_eq!(p.transforms[0].kind, TransformType::Convert);
    assert_eq!(
        p.transforms[0].convert.as_ref().expect("convert").to_type,
        ConvertTarget::Int64
    );
    assert_eq!(
        p.transforms[1].math.as_ref().expect("math").multiply,
        Some(3)
    );

    let c = &t.patches[2];
    let combine = c.combine.as_ref().expect("combine");
    assert_eq!(combine.variables.len(), 2);
    assert_eq!(combine.strategy, CombineStrategy::String);
    assert_eq!(combine.string.as_ref().expect("string").fmt, "%s-%s");
    assert_eq!(
        c.to_field_path_policy(),
        ToFieldPathPolicy::MergeObjectsAppendArrays
    );

    assert_eq!(t.connection_details[0].kind, ConnectionDetailType::FromFieldPath);
    assert_eq!(t.readiness_checks[0].kind, ReadinessCheckType::MatchString);

    let set = &input.patch_sets[0];
    let m = set.patches[0].transforms[0].match_.as_ref().expect("match");
    assert_eq!(m.patterns[0].kind, MatchPatternType::Literal);
    assert_eq!(m.fallback_to, MatchFallbackTo::Input);
    let s = set.patches[0].transforms[1].string.as_ref().expect("string");
    assert_eq!(s.kind, StringTransformType::Convert);
    assert_eq!(s.convert, Some(StringConversion::ToUpper));
}

#[test]
fn request_defaults_missing_sections() {
    let req: RunRequest = serde_json::from_str(r#"{"observed": {}}"#).expect("parse");
    assert_eq!(req.observed, State::default());
    assert_eq!(req.desired, State::default());
    assert!(req.context.is_empty());
    assert!(req.input.is_none());
}

#[test]
fn response_serializes_camel_case_ttl_and_ready() {
    let mut rsp = RunResponse {
        ttl_seconds: 60,
        ..Default::default()
    };
    let mut r = patchform_types::envelope::Resource::new(serde_json::json!({"kind": "Bucket"}));
    r.ready = Ready::True;
    rsp.desired.resources.insert("bucket".to_string(), r);

    let v = serde_json::to_value(&rsp).expect("serialize");
    assert_eq!(v["ttlSeconds"], 60);
    assert_eq!(v["desired"]["resources"]["bucket"]["ready"], "true");
    assert!(v["desired"].get("composite").is_none());
}

#[test]
fn patch_type_names_round_trip() {
    for kind in PatchType::ALL {
        let v = serde_json::to_value(kind).expect("serialize");
        assert_eq!(v, serde_json::json!(kind.as_str()));
        let back: PatchType = serde_json::from_value(v).expect("deserialize");
        assert_eq!(back, kind);
    }
}
