//! String transforms.

use crate::compile;
use crate::error::{TransformError, TransformResult};
use crate::format::sprintf;
use crate::value::{kind_name, render};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use patchform_types::transform::{StringConversion, StringTransform, StringTransformType};
use serde_json::Value;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

fn missing(field: &'static str) -> TransformError {
    TransformError::MissingConfig {
        kind: "string",
        field,
    }
}

/// Check that the sub-configuration for the selected kind is present.
pub fn validate(s: &StringTransform) -> TransformResult<()> {
    match s.kind {
        StringTransformType::Format => s.fmt.as_ref().map(|_| ()).ok_or(missing("fmt")),
        StringTransformType::Convert => s.convert.map(|_| ()).ok_or(missing("convert")),
        StringTransformType::TrimPrefix | StringTransformType::TrimSuffix => {
            s.trim.as_ref().map(|_| ()).ok_or(missing("trim"))
        }
        StringTransformType::Regexp => {
            let r = s.regexp.as_ref().ok_or(missing("regexp"))?;
            compile(&r.pattern).map(|_| ())
        }
        StringTransformType::Join => s.join.as_ref().map(|_| ()).ok_or(missing("join")),
        StringTransformType::Replace => s.replace.as_ref().map(|_| ()).ok_or(missing("replace")),
    }
}

pub fn resolve(s: &StringTransform, input: Value) -> TransformResult<Value> {
    let out = match s.kind {
        StringTransformType::Format => {
            let fmt = s.fmt.as_deref().ok_or(missing("fmt"))?;
            sprintf(fmt, std::slice::from_ref(&input))
        }
        StringTransformType::Convert => {
            return convert(s.convert.ok_or(missing("convert"))?, input);
        }
        StringTransformType::TrimPrefix => {
            let trim = s.trim.as_deref().ok_or(missing("trim"))?;
            let text = render(&input);
            text.strip_prefix(trim).unwrap_or(&text).to_string()
        }
        StringTransformType::TrimSuffix => {
            let trim = s.trim.as_deref().ok_or(missing("trim"))?;
            let text = render(&input);
            text.strip_suffix(trim).unwrap_or(&text).to_string()
        }
        StringTransformType::Regexp => {
            let r = s.regexp.as_ref().ok_or(missing("regexp"))?;
            let re = compile(&r.pattern)?;
            let text = render(&input);
            let caps = re.captures(&text).ok_or_else(|| TransformError::NoMatch {
                pattern: r.pattern.clone(),
                input: text.clone(),
            })?;
            let group = r.group.unwrap_or(0);
            caps.get(group)
                .ok_or_else(|| TransformError::NoGroup {
                    pattern: r.pattern.clone(),
                    group,
                })?
                .as_str()
                .to_string()
        }
        StringTransformType::Join => {
            let join = s.join.as_ref().ok_or(missing("join"))?;
            let Value::Array(items) = &input else {
                return Err(TransformError::InputType {
                    op: "string join",
                    expected: "array",
                    got: kind_name(&input),
                });
            };
            items
                .iter()
                .map(render)
                .collect::<Vec<_>>()
                .join(&join.separator)
        }
        StringTransformType::Replace => {
            let r = s.replace.as_ref().ok_or(missing("replace"))?;
            render(&input).replace(&r.search, &r.replace)
        }
    };
    Ok(Value::String(out))
}

/// Bytes a hash or encoding is computed over: the text of a string, or the
/// JSON encoding of anything else.
fn payload(input: &Value) -> TransformResult<Vec<u8>> {
    match input {
        Value::String(s) => Ok(s.as_bytes().to_vec()),
        other => Ok(serde_json::to_vec(other)?),
    }
}

fn convert(kind: StringConversion, input: Value) -> TransformResult<Value> {
    let out = match kind {
        StringConversion::ToUpper => render(&input).to_uppercase(),
        StringConversion::ToLower => render(&input).to_lowercase(),
        StringConversion::ToBase64 => STANDARD.encode(payload(&input)?),
        StringConversion::FromBase64 => {
            let bytes = STANDARD.decode(render(&input).as_bytes())?;
            String::from_utf8(bytes)?
        }
        StringConversion::ToJson => serde_json::to_string(&input)?,
        StringConversion::ToSha1 => hex::encode(Sha1::digest(payload(&input)?)),
        StringConversion::ToSha256 => hex::encode(Sha256::digest(payload(&input)?)),
        StringConversion::ToSha512 => hex::encode(Sha512::digest(payload(&input)?)),
        StringConversion::ToAdler32 => adler::adler32_slice(&payload(&input)?).to_string(),
    };
    Ok(Value::String(out))
}
