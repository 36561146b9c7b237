//! Port traits abstracting all I/O and expression evaluation away from the
//! pipeline.

use camino::Utf8Path;
use patchform_types::envelope::RunRequest;
use serde_json::Value;

/// Source of run requests.
pub trait RequestSource {
    fn load_request(&self) -> anyhow::Result<RunRequest>;
}

/// Evaluates gating expressions.
///
/// `state` is `{"observed": ..., "desired": ...}` as JSON. The pipeline only
/// accepts a boolean result.
pub trait ConditionEvaluator {
    fn evaluate(&self, expression: &str, state: &Value) -> anyhow::Result<Value>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
