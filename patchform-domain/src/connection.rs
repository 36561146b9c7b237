//! Connection detail extraction from observed composed resources.

use crate::error::ConnectionError;
use patchform_paved::get_path;
use patchform_types::checks::{ConnectionDetail, ConnectionDetailType};
use patchform_types::envelope::ConnectionDetails;
use serde_json::Value;

/// Extracted details plus the rules that could not be applied.
#[derive(Debug, Default)]
pub struct Extracted {
    pub details: ConnectionDetails,
    pub errors: Vec<ConnectionError>,
}

/// Run every rule against the observed document and its connection secret.
///
/// A rule that cannot be applied is skipped; the rest still run. A missing
/// secret key or field path is skipped silently since it may appear on a
/// later reconciliation.
pub fn extract(rules: &[ConnectionDetail], observed: &Value, secret: &ConnectionDetails) -> Extracted {
    let mut out = Extracted::default();
    for (index, rule) in rules.iter().enumerate() {
        match extract_one(index, rule, observed, secret) {
            Ok(Some(bytes)) => {
                out.details.insert(rule.name.clone(), bytes);
            }
            Ok(None) => {}
            Err(e) => out.errors.push(e),
        }
    }
    out
}

fn extract_one(
    index: usize,
    rule: &ConnectionDetail,
    observed: &Value,
    secret: &ConnectionDetails,
) -> Result<Option<Vec<u8>>, ConnectionError> {
    if rule.name.is_empty() {
        return Err(ConnectionError::MissingName { index });
    }
    let missing = |field| ConnectionError::MissingField {
        name: rule.name.clone(),
        field,
    };

    match rule.kind {
        ConnectionDetailType::FromValue => {
            let value = rule.value.as_deref().ok_or_else(|| missing("value"))?;
            Ok(Some(value.as_bytes().to_vec()))
        }
        ConnectionDetailType::FromConnectionSecretKey => {
            let key = rule
                .from_connection_secret_key
                .as_deref()
                .ok_or_else(|| missing("fromConnectionSecretKey"))?;
            Ok(secret.get(key).cloned())
        }
        ConnectionDetailType::FromFieldPath => {
            let path = rule
                .from_field_path
                .as_deref()
                .ok_or_else(|| missing("fromFieldPath"))?;
            let value = match get_path(observed, path) {
                Ok(v) => v,
                Err(e) if e.is_not_found() => return Ok(None),
                Err(source) => {
                    return Err(ConnectionError::Path {
                        name: rule.name.clone(),
                        source,
                    });
                }
            };
            match value {
                Value::String(s) => Ok(Some(s.as_bytes().to_vec())),
                other => serde_json::to_vec(other)
                    .map(Some)
                    .map_err(|source| ConnectionError::Encode {
                        name: rule.name.clone(),
                        source,
                    }),
            }
        }
        ConnectionDetailType::Unknown => Err(ConnectionError::UnknownKind {
            name: rule.name.clone(),
        }),
    }
}
