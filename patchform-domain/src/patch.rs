//! Resolving a single patch between a source and a target document.
//!
//! The caller picks the two documents from the patch type (see
//! [`PatchType::endpoints`]); this module only reads, transforms and writes.
//! Nothing is written until the source read and every transform succeeded,
//! and a write that fails part way leaves the target untouched.

use crate::error::PatchError;
use patchform_paved::{FieldPath, expand_wildcards, get, set_with};
use patchform_transform::{combine, resolve_pipeline};
use patchform_types::patch::{FromFieldPathPolicy, Patch, PatchType};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    /// An optional source path was missing; nothing was written.
    Skipped,
}

/// Compute the value a patch would write, or `None` when an optional source
/// is missing.
pub fn resolve_value(patch: &Patch, from: &Value) -> Result<Option<Value>, PatchError> {
    let policy = patch.from_field_path_policy();

    let raw = if patch.kind.is_combine() {
        let c = patch.combine.as_ref().ok_or(PatchError::MissingField {
            kind: patch.kind,
            field: "combine",
        })?;
        let mut values = Vec::with_capacity(c.variables.len());
        for var in &c.variables {
            match read(from, &var.from_field_path, policy)? {
                Some(v) => values.push(v),
                None => return Ok(None),
            }
        }
        combine::resolve(c, &values)?
    } else if patch.kind == PatchType::PatchSet {
        return Err(PatchError::NotApplicable { kind: patch.kind });
    } else {
        let path = patch
            .from_field_path
            .as_deref()
            .ok_or(PatchError::MissingField {
                kind: patch.kind,
                field: "fromFieldPath",
            })?;
        match read(from, path, policy)? {
            Some(v) => v,
            None => return Ok(None),
        }
    };

    Ok(Some(resolve_pipeline(&patch.transforms, raw)?))
}

fn read(from: &Value, path: &str, policy: FromFieldPathPolicy) -> Result<Option<Value>, PatchError> {
    let path = FieldPath::parse(path)?;
    match get(from, &path) {
        Ok(v) => Ok(Some(v.clone())),
        Err(e) if e.is_not_found() && policy == FromFieldPathPolicy::Optional => {
            tracing::trace!(path = %path, "optional source missing");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolve `patch` against `from` and write the result into `to`.
pub fn apply_patch(patch: &Patch, from: &Value, to: &mut Value) -> Result<PatchOutcome, PatchError> {
    let target = match patch.target_path() {
        Some(p) if !(patch.kind.is_combine() && patch.to_field_path.is_none()) => p,
        _ => {
            return Err(PatchError::MissingField {
                kind: patch.kind,
                field: "toFieldPath",
            });
        }
    };
    let target = FieldPath::parse(target)?;

    let Some(value) = resolve_value(patch, from)? else {
        return Ok(PatchOutcome::Skipped);
    };

    write(to, &target, value, patch)?;
    Ok(PatchOutcome::Applied)
}

fn write(to: &mut Value, target: &FieldPath, value: Value, patch: &Patch) -> Result<(), PatchError> {
    let policy = patch.to_field_path_policy();
    let targets = expand_wildcards(to, target)?;

    if let [single] = targets.as_slice() {
        set_with(to, single, value, policy)?;
        return Ok(());
    }

    let mut staged = to.clone();
    for t in &targets {
        set_with(&mut staged, t, value.clone(), policy)?;
    }
    *to = staged;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchform_types::patch::{
        Combine, CombineStrategy, CombineVariable, PatchPolicy, StringCombine, ToFieldPathPolicy,
    };
    use patchform_types::transform::{ConvertTarget, MathTransform, Transform};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn from_composite(from: &str, to: &str) -> Patch {
        Patch::field_path(PatchType::FromCompositeFieldPath, from, Some(to))
    }

    fn required(mut p: Patch) -> Patch {
        p.policy = Some(PatchPolicy {
            from_field_path: Some(FromFieldPathPolicy::Required),
            to_field_path: None,
        });
        p
    }

    fn combine_patch(vars: &[&str], fmt: &str, to: &str) -> Patch {
        Patch {
            kind: PatchType::CombineFromComposite,
            from_field_path: None,
            to_field_path: Some(to.to_string()),
            combine: Some(Combine {
                variables: vars
                    .iter()
                    .map(|v| CombineVariable {
                        from_field_path: v.to_string(),
                    })
                    .collect(),
                strategy: CombineStrategy::String,
                string: Some(StringCombine {
                    fmt: fmt.to_string(),
                }),
            }),
            ..Patch::field_path(PatchType::CombineFromComposite, "", None)
        }
    }

    #[test]
    fn convert_and_multiply_widgets() {
        let mut p = from_composite("spec.widgets", "spec.watchers");
        p.transforms = vec![
            Transform::convert(ConvertTarget::Int64, None),
            Transform::math(MathTransform {
                multiply: Some(3),
                ..Default::default()
            }),
        ];
        let from = json!({"spec": {"widgets": "10"}});
        let mut to = json!({});
        assert_eq!(apply_patch(&p, &from, &mut to).expect("apply"), PatchOutcome::Applied);
        assert_eq!(to, json!({"spec": {"watchers": 30}}));
    }

    #[test]
    fn target_defaults_to_source_path() {
        let p = Patch::field_path(PatchType::FromCompositeFieldPath, "spec.region", None);
        let mut to = json!({});
        apply_patch(&p, &json!({"spec": {"region": "eu"}}), &mut to).expect("apply");
        assert_eq!(to, json!({"spec": {"region": "eu"}}));
    }

    #[test]
    fn optional_missing_source_is_skipped() {
        let p = from_composite("spec.missing", "spec.out");
        let mut to = json!({"spec": {"out": "keep"}});
        assert_eq!(
            apply_patch(&p, &json!({}), &mut to).expect("skip"),
            PatchOutcome::Skipped
        );
        assert_eq!(to, json!({"spec": {"out": "keep"}}));
    }

    #[test]
    fn required_missing_source_is_not_found() {
        let p = required(from_composite("spec.missing", "spec.out"));
        let mut to = json!({});
        let err = apply_patch(&p, &json!({}), &mut to).expect_err("required");
        assert!(err.is_not_found());
        assert_eq!(to, json!({}));
    }

    #[test]
    fn failed_transform_leaves_target_untouched() {
        let mut p = from_composite("spec.name", "spec.count");
        p.transforms = vec![Transform::math(MathTransform {
            multiply: Some(2),
            ..Default::default()
        })];
        let mut to = json!({"spec": {"count": 1}});
        let err = apply_patch(&p, &json!({"spec": {"name": "x"}}), &mut to).expect_err("math");
        assert!(matches!(err, PatchError::Transform(_)));
        assert_eq!(to, json!({"spec": {"count": 1}}));
    }

    #[test]
    fn combine_formats_variables() {
        let p = combine_patch(&["spec.a", "spec.b"], "%s-%s", "metadata.name");
        let mut to = json!({});
        apply_patch(&p, &json!({"spec": {"a": "foo", "b": "bar"}}), &mut to).expect("apply");
        assert_eq!(to, json!({"metadata": {"name": "foo-bar"}}));
    }

    #[test]
    fn combine_with_any_optional_missing_is_a_no_op() {
        let p = combine_patch(&["spec.a", "spec.b"], "%s-%s", "metadata.name");
        let mut to = json!({});
        assert_eq!(
            apply_patch(&p, &json!({"spec": {"a": "foo"}}), &mut to).expect("skip"),
            PatchOutcome::Skipped
        );
        assert_eq!(to, json!({}));
    }

    #[test]
    fn combine_with_required_missing_is_not_found() {
        let p = required(combine_patch(&["spec.a", "spec.b"], "%s-%s", "metadata.name"));
        let err = apply_patch(&p, &json!({"spec": {"a": "foo"}}), &mut json!({})).expect_err("nf");
        assert!(err.is_not_found());
    }

    #[test]
    fn combine_requires_explicit_target() {
        let mut p = combine_patch(&["spec.a"], "%s", "x");
        p.to_field_path = None;
        let err = apply_patch(&p, &json!({"spec": {"a": 1}}), &mut json!({})).expect_err("target");
        assert!(matches!(err, PatchError::MissingField { field: "toFieldPath", .. }));
    }

    #[test]
    fn sequential_appends_dedupe() {
        let mut p = from_composite("spec.values", "spec.values");
        p.policy = Some(PatchPolicy {
            from_field_path: None,
            to_field_path: Some(ToFieldPathPolicy::MergeObjectsAppendArrays),
        });
        let mut to = json!({});
        apply_patch(&p, &json!({"spec": {"values": [1, 2]}}), &mut to).expect("first");
        apply_patch(&p, &json!({"spec": {"values": [2, 3]}}), &mut to).expect("second");
        assert_eq!(to, json!({"spec": {"values": [1, 2, 3]}}));
    }

    #[test]
    fn wildcard_targets_are_all_written_or_none() {
        let p = from_composite("spec.image", "spec.containers[*].image");
        let from = json!({"spec": {"image": "nginx"}});

        let mut ok = json!({"spec": {"containers": [{"name": "a"}, {"name": "b"}]}});
        apply_patch(&p, &from, &mut ok).expect("apply");
        assert_eq!(ok["spec"]["containers"][1]["image"], json!("nginx"));

        let mut mixed = json!({"spec": {"containers": [{"name": "a"}, "oops"]}});
        let before = mixed.clone();
        apply_patch(&p, &from, &mut mixed).expect_err("shape conflict");
        assert_eq!(mixed, before);
    }

    #[test]
    fn patch_set_patches_are_not_applied() {
        let err = apply_patch(&Patch::patch_set("common"), &json!({}), &mut json!({}))
            .expect_err("patch set");
        assert!(matches!(err, PatchError::MissingField { .. } | PatchError::NotApplicable { .. }));
    }
}
