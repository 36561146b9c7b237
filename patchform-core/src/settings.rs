//! Clap-free settings for the render pipeline.

use patchform_types::keys::ENVIRONMENT_CONTEXT_KEY;

/// Cache lifetime reported when nothing overrides it.
pub const DEFAULT_TTL_SECONDS: u64 = 60;

/// Settings for `run_function`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Reported back as `ttlSeconds`.
    pub ttl_seconds: u64,

    /// Context key the environment document travels under.
    pub environment_key: String,

    /// Copy `metadata.name`/`metadata.namespace` from the observed copy of a
    /// composed resource onto its freshly rendered document.
    pub preserve_identity: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            environment_key: ENVIRONMENT_CONTEXT_KEY.to_string(),
            preserve_identity: true,
        }
    }
}
