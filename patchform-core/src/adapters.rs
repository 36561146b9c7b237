//! Default filesystem-backed port implementations and a small path-based
//! condition evaluator.

use crate::ports::{ConditionEvaluator, RequestSource, WritePort};
use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use patchform_paved::get_path;
use patchform_types::envelope::RunRequest;
use patchform_types::input::Resources;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// On-disk document encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` are YAML; everything else is read as JSON.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("yaml" | "yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }

    pub fn parse<T: DeserializeOwned>(self, text: &str) -> anyhow::Result<T> {
        match self {
            DocumentFormat::Json => serde_json::from_str(text).context("parse JSON"),
            DocumentFormat::Yaml => serde_yaml::from_str(text).context("parse YAML"),
        }
    }

    pub fn render<T: Serialize>(self, value: &T) -> anyhow::Result<String> {
        match self {
            DocumentFormat::Json => {
                let mut out = serde_json::to_string_pretty(value).context("serialize JSON")?;
                out.push('\n');
                Ok(out)
            }
            DocumentFormat::Yaml => serde_yaml::to_string(value).context("serialize YAML"),
        }
    }
}

/// Read a JSON or YAML document, picking the decoder from the extension.
pub fn load_document<T: DeserializeOwned>(path: &Utf8Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path)?;
    DocumentFormat::from_path(path)
        .parse(&text)
        .with_context(|| format!("load {path}"))
}

/// Loads a request file and, optionally, an input configuration file that
/// replaces the request's embedded input.
#[derive(Debug, Clone)]
pub struct FsRequestSource {
    pub request: Utf8PathBuf,
    pub input: Option<Utf8PathBuf>,
}

impl FsRequestSource {
    pub fn new(request: Utf8PathBuf, input: Option<Utf8PathBuf>) -> Self {
        Self { request, input }
    }
}

impl RequestSource for FsRequestSource {
    fn load_request(&self) -> anyhow::Result<RunRequest> {
        let mut request: RunRequest = load_document(&self.request)?;
        if let Some(path) = &self.input {
            let input: Resources = load_document(path)?;
            debug!(input = path.as_str(), templates = input.resources.len(), "loaded input");
            request.input = Some(input);
        }
        Ok(request)
    }
}

/// In-memory request source for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRequestSource {
    request: RunRequest,
}

impl InMemoryRequestSource {
    pub fn new(request: RunRequest) -> Self {
        Self { request }
    }
}

impl RequestSource for InMemoryRequestSource {
    fn load_request(&self) -> anyhow::Result<RunRequest> {
        Ok(self.request.clone())
    }
}

/// Writes through `fs-err`.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        fs::write(path, contents)?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }
}

/// Evaluates expressions of the form
///
/// - `true` / `false`
/// - `<path>` (the value must be a bool), optionally negated with `!`
/// - `<path> == <json>` and `<path> != <json>`
///
/// where `<path>` is a field path into `{observed, desired}`, for example
/// `observed.composite.resource.spec.enabled`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathConditionEvaluator;

impl ConditionEvaluator for PathConditionEvaluator {
    fn evaluate(&self, expression: &str, state: &Value) -> anyhow::Result<Value> {
        let expr = expression.trim();
        match expr {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            _ => {}
        }

        for (op, negate) in [("==", false), ("!=", true)] {
            if let Some((lhs, rhs)) = expr.split_once(op) {
                let want: Value = serde_json::from_str(rhs.trim())
                    .with_context(|| format!("right-hand side of {op} is not a JSON literal"))?;
                let equal = lookup(state, lhs.trim())? == &want;
                return Ok(Value::Bool(equal != negate));
            }
        }

        let (path, negate) = match expr.strip_prefix('!') {
            Some(rest) => (rest.trim(), true),
            None => (expr, false),
        };
        let value = lookup(state, path)?;
        match (value, negate) {
            (Value::Bool(b), true) => Ok(Value::Bool(!b)),
            (_, true) => bail!("cannot negate non-bool value at {path}"),
            (v, false) => Ok(v.clone()),
        }
    }
}

fn lookup<'a>(state: &'a Value, path: &str) -> anyhow::Result<&'a Value> {
    if path.is_empty() {
        bail!("empty expression");
    }
    get_path(state, path).with_context(|| format!("resolve {path}"))
}
