//! Up-front validation of the input configuration.
//!
//! Every problem is collected with its location so a single run reports all
//! of them. Readiness checks and connection detail rules are left to the
//! stages that run them.

use crate::error::{FieldError, ValidationError};
use patchform_paved::FieldPath;
use patchform_transform::{TransformError, combine};
use patchform_types::input::Resources;
use patchform_types::patch::{Patch, PatchScope, PatchType};
use std::collections::BTreeSet;

#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            location: location.into(),
            message: message.into(),
        });
    }

    fn path(&mut self, location: String, path: &str) {
        if let Err(e) = FieldPath::parse(path) {
            self.push(location, e.to_string());
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

pub fn validate(input: &Resources) -> Result<(), ValidationError> {
    let mut c = Collector::default();

    let mut set_names = BTreeSet::new();
    for (i, set) in input.patch_sets.iter().enumerate() {
        let loc = format!("patchSets[{i}]");
        if set.name.is_empty() {
            c.push(format!("{loc}.name"), "name is required");
        } else if !set_names.insert(set.name.as_str()) {
            c.push(format!("{loc}.name"), format!("duplicate name {:?}", set.name));
        }
        for (j, p) in set.patches.iter().enumerate() {
            let ploc = format!("{loc}.patches[{j}]");
            if p.kind == PatchType::PatchSet {
                c.push(format!("{ploc}.type"), "patch sets cannot contain PatchSet patches");
            } else {
                check_patch(&mut c, &ploc, p);
            }
        }
    }

    if let Some(env) = &input.environment {
        for (j, p) in env.patches.iter().enumerate() {
            let ploc = format!("environment.patches[{j}]");
            if p.kind.endpoints(PatchScope::Environment).is_none() {
                c.push(
                    format!("{ploc}.type"),
                    format!("{} is not allowed in environment patches", p.kind),
                );
            } else {
                check_patch(&mut c, &ploc, p);
            }
        }
    }

    let mut template_names = BTreeSet::new();
    for (i, t) in input.resources.iter().enumerate() {
        let loc = format!("resources[{i}]");
        if t.name.is_empty() {
            c.push(format!("{loc}.name"), "name is required");
        } else if !template_names.insert(t.name.as_str()) {
            c.push(format!("{loc}.name"), format!("duplicate name {:?}", t.name));
        }
        for (j, p) in t.patches.iter().enumerate() {
            let ploc = format!("{loc}.patches[{j}]");
            if p.kind != PatchType::PatchSet {
                check_patch(&mut c, &ploc, p);
                continue;
            }
            match p.patch_set_name.as_deref() {
                None | Some("") => c.push(format!("{ploc}.patchSetName"), "patchSetName is required"),
                Some(name) if !set_names.contains(name) => c.push(
                    format!("{ploc}.patchSetName"),
                    format!("undefined patch set {name:?}"),
                ),
                Some(_) => {}
            }
        }
    }

    c.finish()
}

fn check_patch(c: &mut Collector, loc: &str, p: &Patch) {
    if p.kind.is_combine() {
        match &p.combine {
            None => c.push(format!("{loc}.combine"), format!("combine is required for {}", p.kind)),
            Some(comb) => {
                if comb.variables.is_empty() {
                    c.push(format!("{loc}.combine.variables"), "at least one variable is required");
                }
                for (k, var) in comb.variables.iter().enumerate() {
                    let vloc = format!("{loc}.combine.variables[{k}].fromFieldPath");
                    if var.from_field_path.is_empty() {
                        c.push(vloc, "fromFieldPath is required");
                    } else {
                        c.path(vloc, &var.from_field_path);
                    }
                }
                match combine::validate(comb) {
                    Ok(()) | Err(TransformError::NoVariables) => {}
                    Err(e) => c.push(format!("{loc}.combine"), e.to_string()),
                }
            }
        }
        if p.to_field_path.as_deref().is_none_or(str::is_empty) {
            c.push(
                format!("{loc}.toFieldPath"),
                format!("toFieldPath is required for {}", p.kind),
            );
        }
    } else {
        match p.from_field_path.as_deref() {
            None | Some("") => c.push(
                format!("{loc}.fromFieldPath"),
                format!("fromFieldPath is required for {}", p.kind),
            ),
            Some(path) => c.path(format!("{loc}.fromFieldPath"), path),
        }
    }

    if let Some(to) = p.to_field_path.as_deref().filter(|s| !s.is_empty()) {
        c.path(format!("{loc}.toFieldPath"), to);
    }

    for (k, t) in p.transforms.iter().enumerate() {
        if let Err(e) = patchform_transform::validate(t) {
            c.push(format!("{loc}.transforms[{k}]"), e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchform_types::input::{ComposedTemplate, EnvironmentConfig, PatchSet};
    use patchform_types::patch::{Combine, CombineStrategy, StringCombine};
    use patchform_types::transform::{MatchFallbackTo, MatchTransform, Transform};
    use serde_json::json;

    fn template(name: &str, patches: Vec<Patch>) -> ComposedTemplate {
        ComposedTemplate {
            name: name.to_string(),
            base: Some(json!({})),
            patches,
            ..Default::default()
        }
    }

    fn locations(err: ValidationError) -> Vec<String> {
        err.errors.into_iter().map(|e| e.location).collect()
    }

    #[test]
    fn valid_input_passes() {
        let input = Resources {
            resources: vec![template(
                "a",
                vec![Patch::field_path(PatchType::FromCompositeFieldPath, "spec.x", None)],
            )],
            ..Default::default()
        };
        assert_eq!(validate(&input), Ok(()));
    }

    #[test]
    fn zero_variable_combine_is_rejected() {
        let p = Patch {
            kind: PatchType::CombineFromComposite,
            from_field_path: None,
            to_field_path: Some("metadata.name".to_string()),
            combine: Some(Combine {
                variables: vec![],
                strategy: CombineStrategy::String,
                string: Some(StringCombine {
                    fmt: "%s".to_string(),
                }),
            }),
            ..Patch::patch_set("unused")
        };
        let input = Resources {
            resources: vec![template("a", vec![Patch { patch_set_name: None, ..p }])],
            ..Default::default()
        };
        let err = validate(&input).expect_err("zero variables");
        assert_eq!(locations(err), vec!["resources[0].patches[0].combine.variables"]);
    }

    #[test]
    fn names_are_required_and_unique() {
        let input = Resources {
            resources: vec![template("a", vec![]), template("a", vec![]), template("", vec![])],
            patch_sets: vec![
                PatchSet {
                    name: "s".to_string(),
                    patches: vec![],
                },
                PatchSet {
                    name: "s".to_string(),
                    patches: vec![],
                },
            ],
            ..Default::default()
        };
        let err = validate(&input).expect_err("names");
        assert_eq!(
            locations(err),
            vec!["patchSets[1].name", "resources[1].name", "resources[2].name"]
        );
    }

    #[test]
    fn patch_set_references_must_resolve() {
        let input = Resources {
            resources: vec![template("a", vec![Patch::patch_set("missing")])],
            ..Default::default()
        };
        let err = validate(&input).expect_err("undefined");
        assert!(err.to_string().contains("undefined patch set \"missing\""));
    }

    #[test]
    fn nested_patch_sets_and_bad_environment_kinds() {
        let input = Resources {
            patch_sets: vec![PatchSet {
                name: "s".to_string(),
                patches: vec![Patch::patch_set("s")],
            }],
            environment: Some(EnvironmentConfig {
                patches: vec![Patch::field_path(
                    PatchType::FromEnvironmentFieldPath,
                    "x",
                    None,
                )],
            }),
            ..Default::default()
        };
        let err = validate(&input).expect_err("invalid");
        assert_eq!(
            locations(err),
            vec!["patchSets[0].patches[0].type", "environment.patches[0].type"]
        );
    }

    #[test]
    fn transform_and_path_errors_are_located() {
        let mut p = Patch::field_path(PatchType::FromCompositeFieldPath, "spec..x", Some("spec.y"));
        p.transforms = vec![Transform::matching(MatchTransform {
            fallback_to: MatchFallbackTo::Input,
            fallback_value: Some(json!(1)),
            ..Default::default()
        })];
        let input = Resources {
            resources: vec![template("a", vec![p])],
            ..Default::default()
        };
        let err = validate(&input).expect_err("invalid");
        assert_eq!(
            locations(err),
            vec![
                "resources[0].patches[0].fromFieldPath",
                "resources[0].patches[0].transforms[0]"
            ]
        );
    }

    #[test]
    fn combine_needs_target_path() {
        let p = Patch {
            kind: PatchType::CombineToComposite,
            combine: Some(Combine {
                variables: vec![patchform_types::patch::CombineVariable {
                    from_field_path: "spec.a".to_string(),
                }],
                strategy: CombineStrategy::String,
                string: Some(StringCombine {
                    fmt: "%s".to_string(),
                }),
            }),
            ..Patch::field_path(PatchType::CombineToComposite, "spec.a", None)
        };
        let input = Resources {
            resources: vec![template("a", vec![p])],
            ..Default::default()
        };
        let err = validate(&input).expect_err("target");
        assert_eq!(locations(err), vec!["resources[0].patches[0].toFieldPath"]);
    }
}
