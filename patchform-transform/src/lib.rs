//! Value transforms applied between reading a patch source and writing its
//! target.
//!
//! Each transform is a pure function from one document value to another.
//! [`resolve_pipeline`] threads a value through a list of transforms and
//! reports the index of the step that failed.

pub mod combine;
pub mod convert;
pub mod error;
pub mod format;
pub mod map;
pub mod math;
pub mod matcher;
pub mod quantity;
pub mod string;
pub mod value;

pub use error::{TransformError, TransformResult};
pub use format::sprintf;

use patchform_types::transform::{Transform, TransformType};
use regex::Regex;
use serde_json::Value;

pub(crate) fn compile(pattern: &str) -> TransformResult<Regex> {
    Regex::new(pattern).map_err(|source| TransformError::Regex {
        pattern: pattern.to_string(),
        source,
    })
}

fn missing(t: &Transform) -> TransformError {
    TransformError::MissingConfig {
        kind: t.kind.as_str(),
        field: t.kind.as_str(),
    }
}

/// Apply a single transform.
pub fn resolve(t: &Transform, input: Value) -> TransformResult<Value> {
    match t.kind {
        TransformType::Map => map::resolve(t.map.as_ref().ok_or_else(|| missing(t))?, input),
        TransformType::Match => matcher::resolve(t.match_.as_ref().ok_or_else(|| missing(t))?, input),
        TransformType::Math => math::resolve(t.math.as_ref().ok_or_else(|| missing(t))?, input),
        TransformType::String => string::resolve(t.string.as_ref().ok_or_else(|| missing(t))?, input),
        TransformType::Convert => {
            convert::resolve(t.convert.as_ref().ok_or_else(|| missing(t))?, input)
        }
    }
}

/// Apply transforms in order, feeding each output into the next input.
pub fn resolve_pipeline(transforms: &[Transform], input: Value) -> TransformResult<Value> {
    transforms
        .iter()
        .enumerate()
        .try_fold(input, |value, (index, t)| {
            resolve(t, value).map_err(|e| {
                tracing::debug!(index, kind = %t.kind, error = %e, "transform failed");
                TransformError::AtIndex {
                    index,
                    source: Box::new(e),
                }
            })
        })
}

/// Check a transform's configuration without running it.
pub fn validate(t: &Transform) -> TransformResult<()> {
    match t.kind {
        TransformType::Map => t.map.as_ref().map(|_| ()).ok_or_else(|| missing(t)),
        TransformType::Match => matcher::validate(t.match_.as_ref().ok_or_else(|| missing(t))?),
        TransformType::Math => math::validate(t.math.as_ref().ok_or_else(|| missing(t))?),
        TransformType::String => string::validate(t.string.as_ref().ok_or_else(|| missing(t))?),
        TransformType::Convert => convert::validate(t.convert.as_ref().ok_or_else(|| missing(t))?),
    }
}
