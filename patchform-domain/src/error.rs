//! Error types for patch resolution, patch-set expansion, validation and the
//! best-effort readiness and connection stages.

use patchform_paved::PathError;
use patchform_transform::TransformError;
use patchform_types::checks::ReadinessCheckType;
use patchform_types::patch::PatchType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("{kind} patch requires {field}")]
    MissingField {
        kind: PatchType,
        field: &'static str,
    },

    #[error("{kind} patches cannot be applied directly")]
    NotApplicable { kind: PatchType },

    #[error("{0}")]
    Path(#[from] PathError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl PatchError {
    /// True when the patch failed only because a source path was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PatchError::Path(e) if e.is_not_found())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchSetError {
    #[error("undefined patch set {name:?}")]
    Undefined { name: String },

    #[error("patch set {name:?} contains a PatchSet patch; patch sets do not nest")]
    Nested { name: String },

    #[error("PatchSet patch is missing patchSetName")]
    MissingName,
}

/// One problem found while validating input, with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct FieldError {
    pub location: String,
    pub message: String,
}

/// Every problem found in one input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: {}", join_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("readiness check {index} has an unknown type")]
    UnknownKind { index: usize },

    #[error("readiness check {index} ({kind:?}) requires {field}")]
    MissingField {
        index: usize,
        kind: ReadinessCheckType,
        field: &'static str,
    },

    #[error("readiness check {index}: {source}")]
    Path {
        index: usize,
        #[source]
        source: PathError,
    },

    #[error("readiness check {index}: {path} is {got}, expected {expected}")]
    ValueType {
        index: usize,
        path: String,
        expected: &'static str,
        got: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection detail {index} has no name")]
    MissingName { index: usize },

    #[error("connection detail {name:?} has an unknown type")]
    UnknownKind { name: String },

    #[error("connection detail {name:?} requires {field}")]
    MissingField { name: String, field: &'static str },

    #[error("connection detail {name:?}: {source}")]
    Path {
        name: String,
        #[source]
        source: PathError,
    },

    #[error("connection detail {name:?}: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_seen_through_patch_errors() {
        let err = PatchError::from(PathError::NotFound {
            path: "spec.a".to_string(),
        });
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "spec.a: no such field");

        let other = PatchError::MissingField {
            kind: PatchType::CombineFromComposite,
            field: "combine",
        };
        assert!(!other.is_not_found());
    }

    #[test]
    fn validation_error_lists_every_location() {
        let err = ValidationError {
            errors: vec![
                FieldError {
                    location: "resources[0].name".to_string(),
                    message: "name is required".to_string(),
                },
                FieldError {
                    location: "patchSets[1].name".to_string(),
                    message: "duplicate name \"a\"".to_string(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "invalid input: resources[0].name: name is required; patchSets[1].name: duplicate name \"a\""
        );
    }
}
