//! Domain logic: resolve patches between documents and evaluate the
//! best-effort readiness and connection stages.
//!
//! This crate owns *what* a patch does to a pair of documents. It does not
//! decide which documents a template reads from or how results become
//! diagnostics; that's the `patchform-core` pipeline.

pub mod connection;
pub mod error;
pub mod patch;
pub mod patchset;
pub mod ready;
pub mod validate;

pub use connection::{Extracted, extract};
pub use error::{
    ConnectionError, FieldError, PatchError, PatchSetError, ReadinessError, ValidationError,
};
pub use patch::{PatchOutcome, apply_patch, resolve_value};
pub use patchset::{expand_patches, expand_resources};
pub use ready::{condition_matches, is_ready};
pub use validate::validate;
