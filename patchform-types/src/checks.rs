//! Readiness checks and connection detail rules.
//!
//! Both are evaluated best-effort against the observed copy of a composed
//! resource, so unknown kinds deserialize into an `Unknown` variant and are
//! reported when they run rather than rejecting the whole input.

use crate::keys;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessCheckType {
    None,
    NonEmpty,
    MatchString,
    MatchInteger,
    MatchTrue,
    MatchFalse,
    MatchCondition,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConditionCheck {
    #[serde(rename = "type", default = "default_condition_type")]
    pub condition_type: String,

    #[serde(default = "default_condition_status")]
    pub status: String,
}

fn default_condition_type() -> String {
    keys::READY_CONDITION_TYPE.to_string()
}

fn default_condition_status() -> String {
    keys::CONDITION_TRUE.to_string()
}

impl Default for MatchConditionCheck {
    fn default() -> Self {
        Self {
            condition_type: default_condition_type(),
            status: default_condition_status(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessCheck {
    #[serde(rename = "type")]
    pub kind: ReadinessCheckType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_integer: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_condition: Option<MatchConditionCheck>,
}

impl ReadinessCheck {
    /// The check used when a template declares none: `Ready` is `True`.
    pub fn ready_condition() -> Self {
        Self {
            kind: ReadinessCheckType::MatchCondition,
            field_path: None,
            match_string: None,
            match_integer: None,
            match_condition: Some(MatchConditionCheck::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionDetailType {
    FromConnectionSecretKey,
    FromFieldPath,
    FromValue,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetail {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ConnectionDetailType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_connection_secret_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_field_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_readiness_kind_is_preserved_as_unknown() {
        let c: ReadinessCheck =
            serde_json::from_value(serde_json::json!({ "type": "MatchBanana" }))
                .expect("deserialize");
        assert_eq!(c.kind, ReadinessCheckType::Unknown);
    }

    #[test]
    fn match_condition_defaults_to_ready_true() {
        let c: ReadinessCheck = serde_json::from_value(serde_json::json!({
            "type": "MatchCondition",
            "matchCondition": {}
        }))
        .expect("deserialize");
        assert_eq!(c.match_condition, Some(MatchConditionCheck::default()));
        assert_eq!(c, ReadinessCheck::ready_condition());
    }
}
