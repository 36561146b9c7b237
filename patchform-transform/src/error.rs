use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A step of a pipeline failed.
    #[error("transform at index {index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<TransformError>,
    },

    #[error("{kind} transform requires {field}")]
    MissingConfig {
        kind: &'static str,
        field: &'static str,
    },

    #[error("{op}: expected {expected} input, got {got}")]
    InputType {
        op: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("key {0:?} not found in map")]
    MapKeyMissing(String),

    #[error("fallbackTo Input cannot be combined with a fallbackValue")]
    ConflictingFallback,

    #[error("invalid regexp {pattern:?}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("regexp {pattern:?} does not match {input:?}")]
    NoMatch { pattern: String, input: String },

    #[error("regexp {pattern:?} has no capture group {group}")]
    NoGroup { pattern: String, group: usize },

    #[error("unknown convert format {0:?}")]
    UnknownFormat(String),

    #[error("cannot convert {from} to {to} with format {format}")]
    UnsupportedConversion {
        from: &'static str,
        to: &'static str,
        format: &'static str,
    },

    #[error("cannot parse {input:?} as {target}: {reason}")]
    Parse {
        input: String,
        target: &'static str,
        reason: String,
    },

    #[error("{op}: result overflows int64")]
    Overflow { op: &'static str },

    #[error("{op}: result {value} is not a finite number")]
    NotFinite { op: &'static str, value: f64 },

    #[error("base64 decode: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded value is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("combine requires at least one variable")]
    NoVariables,
}

impl TransformError {
    /// The innermost error, with pipeline indices stripped.
    pub fn root(&self) -> &TransformError {
        match self {
            TransformError::AtIndex { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type TransformResult<T> = Result<T, TransformError>;
