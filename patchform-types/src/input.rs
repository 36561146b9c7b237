use crate::checks::{ConnectionDetail, ReadinessCheck};
use crate::patch::Patch;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input configuration: the resource templates to render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    #[serde(default)]
    pub resources: Vec<ComposedTemplate>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patch_sets: Vec<PatchSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentConfig>,

    /// Expression gating the whole run. Evaluated by an external collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// One declared resource template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedTemplate {
    #[serde(default)]
    pub name: String,

    /// Literal base document. When absent the template adopts the document a
    /// previous pipeline stage produced under the same name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patches: Vec<Patch>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connection_details: Vec<ConnectionDetail>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub readiness_checks: Vec<ReadinessCheck>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// A named, reusable list of patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchSet {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub patches: Vec<Patch>,
}

/// Patches between the composite and the environment, run before any template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub patches: Vec<Patch>,
}
