//! Shared DTOs (schemas-as-code) for the patchform workspace.
//!
//! # Design constraints
//! - These types mirror the wire format of the input configuration and the
//!   request/response envelopes; they carry no behavior beyond defaults.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod checks;
pub mod envelope;
pub mod input;
pub mod patch;
pub mod transform;

/// Well-known keys and values shared by the engine and its callers.
pub mod keys {
    /// Context key under which the environment (side document) travels.
    pub const ENVIRONMENT_CONTEXT_KEY: &str = "apiextensions.crossplane.io/environment";

    /// Status condition consulted when a template declares no readiness checks.
    pub const READY_CONDITION_TYPE: &str = "Ready";

    /// Condition status that counts as ready.
    pub const CONDITION_TRUE: &str = "True";
}
