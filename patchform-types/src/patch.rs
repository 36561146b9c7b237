use crate::transform::Transform;
use serde::{Deserialize, Serialize};

/// Patch kind.
///
/// Every executable kind connects two documents: the composite (parent), the
/// composed resource being rendered for a template (sibling), or the
/// environment (side document). `PatchSet` is a macro reference that is
/// expanded away before anything runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatchType {
    FromCompositeFieldPath,
    ToCompositeFieldPath,
    CombineFromComposite,
    CombineToComposite,
    FromEnvironmentFieldPath,
    ToEnvironmentFieldPath,
    CombineFromEnvironment,
    CombineToEnvironment,
    PatchSet,
}

impl PatchType {
    pub const ALL: [PatchType; 9] = [
        PatchType::FromCompositeFieldPath,
        PatchType::ToCompositeFieldPath,
        PatchType::CombineFromComposite,
        PatchType::CombineToComposite,
        PatchType::FromEnvironmentFieldPath,
        PatchType::ToEnvironmentFieldPath,
        PatchType::CombineFromEnvironment,
        PatchType::CombineToEnvironment,
        PatchType::PatchSet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PatchType::FromCompositeFieldPath => "FromCompositeFieldPath",
            PatchType::ToCompositeFieldPath => "ToCompositeFieldPath",
            PatchType::CombineFromComposite => "CombineFromComposite",
            PatchType::CombineToComposite => "CombineToComposite",
            PatchType::FromEnvironmentFieldPath => "FromEnvironmentFieldPath",
            PatchType::ToEnvironmentFieldPath => "ToEnvironmentFieldPath",
            PatchType::CombineFromEnvironment => "CombineFromEnvironment",
            PatchType::CombineToEnvironment => "CombineToEnvironment",
            PatchType::PatchSet => "PatchSet",
        }
    }

    pub fn is_combine(self) -> bool {
        matches!(
            self,
            PatchType::CombineFromComposite
                | PatchType::CombineToComposite
                | PatchType::CombineFromEnvironment
                | PatchType::CombineToEnvironment
        )
    }

    /// Source and target documents for this kind within `scope`.
    ///
    /// Returns `None` for `PatchSet` and for kinds that are not valid in the
    /// scope (only composite kinds may appear in environment patches).
    pub fn endpoints(self, scope: PatchScope) -> Option<(DocumentRole, DocumentRole)> {
        use DocumentRole::{Composed, Composite, Environment};
        match (scope, self) {
            (PatchScope::Template, PatchType::FromCompositeFieldPath)
            | (PatchScope::Template, PatchType::CombineFromComposite) => {
                Some((Composite, Composed))
            }
            (PatchScope::Template, PatchType::ToCompositeFieldPath)
            | (PatchScope::Template, PatchType::CombineToComposite) => {
                Some((Composed, Composite))
            }
            (PatchScope::Template, PatchType::FromEnvironmentFieldPath)
            | (PatchScope::Template, PatchType::CombineFromEnvironment) => {
                Some((Environment, Composed))
            }
            (PatchScope::Template, PatchType::ToEnvironmentFieldPath)
            | (PatchScope::Template, PatchType::CombineToEnvironment) => {
                Some((Composed, Environment))
            }
            (PatchScope::Environment, PatchType::FromCompositeFieldPath)
            | (PatchScope::Environment, PatchType::CombineFromComposite) => {
                Some((Composite, Environment))
            }
            (PatchScope::Environment, PatchType::ToCompositeFieldPath)
            | (PatchScope::Environment, PatchType::CombineToComposite) => {
                Some((Environment, Composite))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for PatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a patch list is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchScope {
    /// Patches attached to a resource template.
    Template,
    /// Top-level environment patches (composite <-> environment).
    Environment,
}

/// The documents a patch can read from or write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentRole {
    Composite,
    Composed,
    Environment,
}

/// What to do when the source field path does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FromFieldPathPolicy {
    #[default]
    Optional,
    Required,
}

/// How a resolved value is written to the target field path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToFieldPathPolicy {
    #[default]
    Replace,
    MergeObjects,
    MergeObjectsAppendArrays,
    ForceMergeObjects,
    ForceMergeObjectsAppendArrays,
}

impl ToFieldPathPolicy {
    /// Incoming object values overwrite existing keys.
    pub fn overwrites(self) -> bool {
        matches!(
            self,
            ToFieldPathPolicy::ForceMergeObjects | ToFieldPathPolicy::ForceMergeObjectsAppendArrays
        )
    }

    /// Arrays are concatenated (and scalar duplicates dropped).
    pub fn appends_arrays(self) -> bool {
        matches!(
            self,
            ToFieldPathPolicy::MergeObjectsAppendArrays
                | ToFieldPathPolicy::ForceMergeObjectsAppendArrays
        )
    }

    pub fn is_merge(self) -> bool {
        !matches!(self, ToFieldPathPolicy::Replace)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_field_path: Option<FromFieldPathPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_field_path: Option<ToFieldPathPolicy>,
}

/// A declared patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    #[serde(rename = "type", default = "default_patch_type")]
    pub kind: PatchType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_field_path: Option<String>,

    /// Defaults to `from_field_path` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_field_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combine: Option<Combine>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Transform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<PatchPolicy>,

    /// Name of the patch set this patch expands to (`PatchSet` kind only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_set_name: Option<String>,
}

fn default_patch_type() -> PatchType {
    PatchType::FromCompositeFieldPath
}

impl Patch {
    /// A field path patch of `kind` copying `from` to `to`.
    pub fn field_path(kind: PatchType, from: &str, to: Option<&str>) -> Self {
        Self {
            kind,
            from_field_path: Some(from.to_string()),
            to_field_path: to.map(str::to_string),
            combine: None,
            transforms: Vec::new(),
            policy: None,
            patch_set_name: None,
        }
    }

    /// A reference to the patch set called `name`.
    pub fn patch_set(name: &str) -> Self {
        Self {
            kind: PatchType::PatchSet,
            from_field_path: None,
            to_field_path: None,
            combine: None,
            transforms: Vec::new(),
            policy: None,
            patch_set_name: Some(name.to_string()),
        }
    }

    /// Target path, falling back to the source path.
    pub fn target_path(&self) -> Option<&str> {
        self.to_field_path
            .as_deref()
            .or(self.from_field_path.as_deref())
    }

    pub fn from_field_path_policy(&self) -> FromFieldPathPolicy {
        self.policy
            .as_ref()
            .and_then(|p| p.from_field_path)
            .unwrap_or_default()
    }

    pub fn to_field_path_policy(&self) -> ToFieldPathPolicy {
        self.policy
            .as_ref()
            .and_then(|p| p.to_field_path)
            .unwrap_or_default()
    }
}

/// Combines several source values into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combine {
    #[serde(default)]
    pub variables: Vec<CombineVariable>,

    #[serde(default)]
    pub strategy: CombineStrategy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<StringCombine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombineVariable {
    #[serde(default)]
    pub from_field_path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CombineStrategy {
    /// Positional printf-style substitution of every variable.
    #[default]
    String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringCombine {
    pub fmt: String,
}
