//! Embeddable core library for patchform.
//!
//! Provides a clap-free, I/O-abstracted entry point that renders the desired
//! state for one request from an input configuration of resource templates.
//!
//! # Port traits
//!
//! Everything outside the pure engine sits behind the traits in [`ports`]:
//! - [`RequestSource`](ports::RequestSource): load a run request
//! - [`ConditionEvaluator`](ports::ConditionEvaluator): evaluate gating expressions
//! - [`WritePort`](ports::WritePort): write files and create directories
//!
//! The [`adapters`] module provides filesystem-backed implementations and a
//! field-path based condition evaluator.
//!
//! # Entry points
//!
//! - [`run_function`](pipeline::run_function): render one in-memory request
//! - [`run`](pipeline::run): load a request through a port, then render it

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use pipeline::{RunError, run, run_function, write_response};
pub use settings::EngineSettings;

// Re-export the envelope types so embedders don't need patchform-types directly.
pub use patchform_types::envelope::{Diagnostic, RunRequest, RunResponse, Severity};
