//! Catalog of transform and patch kinds for `list-transforms` and `explain`.

use patchform_types::patch::PatchType;
use patchform_types::transform::TransformType;

/// Information about one transform type.
#[derive(Debug, Clone)]
pub struct TransformEntry {
    pub kind: TransformType,
    pub title: &'static str,
    /// Sub-kinds accepted in the transform's `type` field, if any.
    pub variants: &'static [&'static str],
    pub description: &'static str,
}

pub static TRANSFORM_REGISTRY: &[TransformEntry] = &[
    TransformEntry {
        kind: TransformType::Map,
        title: "Static lookup",
        variants: &[],
        description: "Looks the string input up in a fixed key/value table. A missing key is an error.",
    },
    TransformEntry {
        kind: TransformType::Match,
        title: "Pattern match",
        variants: &["literal", "regexp"],
        description: r#"Tries each pattern in order and yields the result of the first match.
Without a match it yields `fallbackValue`, the input itself with
`fallbackTo: Input`, or no value at all. Setting both is rejected."#,
    },
    TransformEntry {
        kind: TransformType::Math,
        title: "Arithmetic",
        variants: &["Multiply", "ClampMin", "ClampMax"],
        description: "Multiplies or clamps a number. Integers stay integers and floats stay floats.",
    },
    TransformEntry {
        kind: TransformType::String,
        title: "String operations",
        variants: &["Format", "Convert", "TrimPrefix", "TrimSuffix", "Regexp", "Join", "Replace"],
        description: r#"printf-style formatting, case and encoding conversions
(ToUpper, ToLower, ToBase64, FromBase64, ToJson, ToSha1, ToSha256, ToSha512,
ToAdler32), trimming, regexp extraction, joining arrays and replacing text."#,
    },
    TransformEntry {
        kind: TransformType::Convert,
        title: "Type conversion",
        variants: &["string", "int", "int64", "bool", "float64", "object", "array"],
        description: r#"Converts between value types. The `format` hint selects `none`,
`quantity` (e.g. "250m" -> 0.25) or `json` encoding."#,
    },
];

/// Find a transform by type name, ignoring case.
pub fn lookup_transform(query: &str) -> Option<&'static TransformEntry> {
    TRANSFORM_REGISTRY
        .iter()
        .find(|t| t.kind.as_str().eq_ignore_ascii_case(query.trim()))
}

/// Find a patch type by name, ignoring case.
pub fn lookup_patch_type(query: &str) -> Option<PatchType> {
    PatchType::ALL
        .into_iter()
        .find(|p| p.as_str().eq_ignore_ascii_case(query.trim()))
}

/// One-line summary of where a patch type reads and writes.
pub fn patch_type_summary(kind: PatchType) -> &'static str {
    match kind {
        PatchType::FromCompositeFieldPath => "composite field -> composed resource",
        PatchType::ToCompositeFieldPath => "composed resource field -> composite",
        PatchType::CombineFromComposite => "several composite fields -> composed resource",
        PatchType::CombineToComposite => "several composed resource fields -> composite",
        PatchType::FromEnvironmentFieldPath => "environment field -> composed resource",
        PatchType::ToEnvironmentFieldPath => "composed resource field -> environment",
        PatchType::CombineFromEnvironment => "several environment fields -> composed resource",
        PatchType::CombineToEnvironment => "several composed resource fields -> environment",
        PatchType::PatchSet => "inline the patches of a named patch set",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_transform_type_is_listed_once() {
        for kind in TransformType::ALL {
            let n = TRANSFORM_REGISTRY.iter().filter(|t| t.kind == kind).count();
            assert_eq!(n, 1, "{kind}");
        }
    }

    #[test]
    fn lookups_ignore_case() {
        assert_eq!(lookup_transform("MATH").map(|t| t.kind), Some(TransformType::Math));
        assert_eq!(
            lookup_patch_type("combinetocomposite"),
            Some(PatchType::CombineToComposite)
        );
        assert!(lookup_transform("nope").is_none());
    }
}
