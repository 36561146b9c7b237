use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformType {
    Map,
    Match,
    Math,
    String,
    Convert,
}

impl TransformType {
    pub const ALL: [TransformType; 5] = [
        TransformType::Map,
        TransformType::Match,
        TransformType::Math,
        TransformType::String,
        TransformType::Convert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransformType::Map => "map",
            TransformType::Match => "match",
            TransformType::Math => "math",
            TransformType::String => "string",
            TransformType::Convert => "convert",
        }
    }
}

impl std::fmt::Display for TransformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a transform pipeline.
///
/// Exactly the sub-object named by `kind` is consulted; validation rejects a
/// transform whose sub-object is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(rename = "type")]
    pub kind: TransformType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapTransform>,

    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_: Option<MatchTransform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub math: Option<MathTransform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<StringTransform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convert: Option<ConvertTransform>,
}

impl Transform {
    fn empty(kind: TransformType) -> Self {
        Self {
            kind,
            map: None,
            match_: None,
            math: None,
            string: None,
            convert: None,
        }
    }

    pub fn map(pairs: BTreeMap<String, Value>) -> Self {
        Self {
            map: Some(MapTransform { pairs }),
            ..Self::empty(TransformType::Map)
        }
    }

    pub fn matching(m: MatchTransform) -> Self {
        Self {
            match_: Some(m),
            ..Self::empty(TransformType::Match)
        }
    }

    pub fn math(m: MathTransform) -> Self {
        Self {
            math: Some(m),
            ..Self::empty(TransformType::Math)
        }
    }

    pub fn string(s: StringTransform) -> Self {
        Self {
            string: Some(s),
            ..Self::empty(TransformType::String)
        }
    }

    pub fn convert(to_type: ConvertTarget, format: Option<&str>) -> Self {
        Self {
            convert: Some(ConvertTransform {
                to_type,
                format: format.map(str::to_string),
            }),
            ..Self::empty(TransformType::Convert)
        }
    }
}

/// Static string-keyed lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapTransform {
    pub pairs: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathTransformType {
    #[default]
    Multiply,
    ClampMin,
    ClampMax,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathTransform {
    #[serde(rename = "type", default)]
    pub kind: MathTransformType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiply: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clamp_min: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clamp_max: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchPatternType {
    Literal,
    Regexp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPattern {
    #[serde(rename = "type")]
    pub kind: MatchPatternType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regexp: Option<String>,

    #[serde(default)]
    pub result: Value,
}

impl MatchPattern {
    pub fn literal(literal: &str, result: Value) -> Self {
        Self {
            kind: MatchPatternType::Literal,
            literal: Some(literal.to_string()),
            regexp: None,
            result,
        }
    }

    pub fn regexp(regexp: &str, result: Value) -> Self {
        Self {
            kind: MatchPatternType::Regexp,
            literal: None,
            regexp: Some(regexp.to_string()),
            result,
        }
    }
}

/// What a match transform yields when no pattern matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchFallbackTo {
    /// The configured `fallback_value`, or no value at all.
    #[default]
    Value,
    /// The unchanged input.
    Input,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTransform {
    #[serde(default)]
    pub patterns: Vec<MatchPattern>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_value: Option<Value>,

    #[serde(default)]
    pub fallback_to: MatchFallbackTo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringTransformType {
    #[default]
    Format,
    Convert,
    TrimPrefix,
    TrimSuffix,
    Regexp,
    Join,
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringConversion {
    ToUpper,
    ToLower,
    ToBase64,
    FromBase64,
    ToJson,
    ToSha1,
    ToSha256,
    ToSha512,
    ToAdler32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringRegexp {
    #[serde(rename = "match")]
    pub pattern: String,

    /// Capture group to extract; the whole match when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringJoin {
    pub separator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringReplace {
    pub search: String,
    #[serde(default)]
    pub replace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringTransform {
    #[serde(rename = "type", default)]
    pub kind: StringTransformType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fmt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convert: Option<StringConversion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regexp: Option<StringRegexp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<StringJoin>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<StringReplace>,
}

impl StringTransform {
    pub fn format(fmt: &str) -> Self {
        Self {
            kind: StringTransformType::Format,
            fmt: Some(fmt.to_string()),
            ..Default::default()
        }
    }

    pub fn conversion(convert: StringConversion) -> Self {
        Self {
            kind: StringTransformType::Convert,
            convert: Some(convert),
            ..Default::default()
        }
    }
}

/// Target type of a convert transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertTarget {
    String,
    Int,
    Int64,
    Bool,
    Float64,
    Object,
    Array,
}

impl ConvertTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            ConvertTarget::String => "string",
            ConvertTarget::Int => "int",
            ConvertTarget::Int64 => "int64",
            ConvertTarget::Bool => "bool",
            ConvertTarget::Float64 => "float64",
            ConvertTarget::Object => "object",
            ConvertTarget::Array => "array",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertTransform {
    pub to_type: ConvertTarget,

    /// `none`, `quantity` or `json`. Kept as text: an unknown hint only
    /// matters when a conversion actually happens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}
