//! Readiness evaluation for observed composed resources.

use crate::error::ReadinessError;
use patchform_paved::get_path;
use patchform_types::checks::{MatchConditionCheck, ReadinessCheck, ReadinessCheckType};
use serde_json::Value;

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// True when every check passes. With no checks the resource is ready when
/// its `Ready` condition is `True`.
pub fn is_ready(checks: &[ReadinessCheck], observed: &Value) -> Result<bool, ReadinessError> {
    if checks.is_empty() {
        return check_passes(0, &ReadinessCheck::ready_condition(), observed);
    }
    for (index, check) in checks.iter().enumerate() {
        if !check_passes(index, check, observed)? {
            tracing::debug!(index, kind = ?check.kind, "readiness check not satisfied");
            return Ok(false);
        }
    }
    Ok(true)
}

fn check_passes(index: usize, check: &ReadinessCheck, observed: &Value) -> Result<bool, ReadinessError> {
    let missing = |field| ReadinessError::MissingField {
        index,
        kind: check.kind,
        field,
    };
    let field_path = || check.field_path.as_deref().ok_or_else(|| missing("fieldPath"));
    let wrong = |path: &str, expected, got: &Value| ReadinessError::ValueType {
        index,
        path: path.to_string(),
        expected,
        got: kind_name(got),
    };

    match check.kind {
        ReadinessCheckType::None => Ok(true),
        ReadinessCheckType::NonEmpty => Ok(lookup(observed, index, field_path()?)?.is_some()),
        ReadinessCheckType::MatchString => {
            let want = check.match_string.as_deref().ok_or_else(|| missing("matchString"))?;
            let path = field_path()?;
            match lookup(observed, index, path)? {
                None => Ok(false),
                Some(Value::String(s)) => Ok(s == want),
                Some(other) => Err(wrong(path, "a string", other)),
            }
        }
        ReadinessCheckType::MatchInteger => {
            let want = check.match_integer.ok_or_else(|| missing("matchInteger"))?;
            let path = field_path()?;
            match lookup(observed, index, path)? {
                None => Ok(false),
                Some(Value::Number(n)) => Ok(integer_of(n) == Some(want)),
                Some(other) => Err(wrong(path, "an integer", other)),
            }
        }
        ReadinessCheckType::MatchTrue | ReadinessCheckType::MatchFalse => {
            let want = check.kind == ReadinessCheckType::MatchTrue;
            let path = field_path()?;
            match lookup(observed, index, path)? {
                None => Ok(false),
                Some(Value::Bool(b)) => Ok(*b == want),
                Some(other) => Err(wrong(path, "a bool", other)),
            }
        }
        ReadinessCheckType::MatchCondition => {
            let want = check.match_condition.clone().unwrap_or_default();
            Ok(condition_matches(observed, &want))
        }
        ReadinessCheckType::Unknown => Err(ReadinessError::UnknownKind { index }),
    }
}

fn lookup<'a>(
    observed: &'a Value,
    index: usize,
    path: &str,
) -> Result<Option<&'a Value>, ReadinessError> {
    match get_path(observed, path) {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(source) => Err(ReadinessError::Path { index, source }),
    }
}

fn integer_of(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Whether `status.conditions` holds an entry of the given type and status.
pub fn condition_matches(observed: &Value, want: &MatchConditionCheck) -> bool {
    let Ok(Value::Array(conditions)) = get_path(observed, "status.conditions") else {
        return false;
    };
    conditions.iter().any(|c| {
        c.get("type").and_then(Value::as_str) == Some(want.condition_type.as_str())
            && c.get("status").and_then(Value::as_str) == Some(want.status.as_str())
    })
}
