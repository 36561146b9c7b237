//! Error types for patchform-paved.
//!
//! This module distinguishes between:
//! - Missing data (`NotFound`): recoverable, the caller decides per patch policy
//! - Shape errors (`TypeMismatch`, `Wildcard`, `NoExpansion`): the document or
//!   path cannot be used as asked
//! - Malformed paths (`Parse`)

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path text is not a valid field path.
    #[error("invalid field path {path:?}: {reason}")]
    Parse { path: String, reason: String },

    /// A field or element along the path does not exist.
    #[error("{path}: no such field")]
    NotFound { path: String },

    /// A value along the path has the wrong shape for the next segment.
    #[error("{path}: {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
    },

    /// The operation needs a concrete path but got one with `[*]`.
    #[error("{path}: wildcards are not supported here")]
    Wildcard { path: String },

    /// Expanding `[*]` produced no concrete paths.
    #[error("cannot expand wildcards for {path}: no matching elements")]
    NoExpansion { path: String },
}

impl PathError {
    /// Returns true if this error only reports missing data.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PathError::NotFound { .. })
    }
}

/// Result type alias using PathError.
pub type PathResult<T> = Result<T, PathError>;
