//! BDD harness (cucumber-rs).
//!
//! This crate exists to keep scenario tests isolated from the production
//! crates. The helpers here turn docstrings into documents and query
//! responses.

use anyhow::Context;
use patchform_types::envelope::{RunResponse, Severity};
use serde_json::Value;

/// Parse a docstring as YAML (which also accepts JSON).
pub fn parse_doc(text: &str) -> anyhow::Result<Value> {
    serde_yaml::from_str(text).context("docstring is not YAML or JSON")
}

/// Messages of the given severity that contain `needle`.
pub fn diagnostics_mentioning<'a>(
    response: &'a RunResponse,
    severity: Severity,
    needle: &str,
) -> Vec<&'a str> {
    response
        .results
        .iter()
        .filter(|d| d.severity == severity && d.message.contains(needle))
        .map(|d| d.message.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchform_types::envelope::Diagnostic;
    use serde_json::json;

    #[test]
    fn yaml_and_json_docstrings() {
        assert_eq!(parse_doc("a: 1\nb: [x]").expect("yaml"), json!({"a": 1, "b": ["x"]}));
        assert_eq!(parse_doc(r#"{"a": "1"}"#).expect("json"), json!({"a": "1"}));
    }

    #[test]
    fn filters_by_severity_and_text() {
        let rsp = RunResponse {
            results: vec![
                Diagnostic::warning("template \"a\" skipped"),
                Diagnostic::fatal("template \"a\" broke"),
            ],
            ..Default::default()
        };
        assert_eq!(diagnostics_mentioning(&rsp, Severity::Warning, "\"a\"").len(), 1);
        assert_eq!(diagnostics_mentioning(&rsp, Severity::Fatal, "broke").len(), 1);
        assert!(diagnostics_mentioning(&rsp, Severity::Fatal, "skipped").is_empty());
    }
}
