//! Ordered pattern matching with a fallback.

use crate::compile;
use crate::error::{TransformError, TransformResult};
use crate::value::kind_name;
use patchform_types::transform::{MatchFallbackTo, MatchPatternType, MatchTransform};
use regex::Regex;
use serde_json::Value;

enum Pattern<'a> {
    Literal(&'a str),
    Regexp(Regex),
}

impl Pattern<'_> {
    fn is_hit(&self, input: &Value) -> TransformResult<bool> {
        match self {
            Pattern::Literal(literal) => Ok(input.as_str() == Some(*literal)),
            Pattern::Regexp(re) => match input {
                Value::Null => Ok(false),
                Value::String(s) => Ok(re.is_match(s)),
                other => Err(TransformError::InputType {
                    op: "match regexp",
                    expected: "string",
                    got: kind_name(other),
                }),
            },
        }
    }
}

/// A match transform with every pattern checked and compiled.
pub struct Matcher<'a> {
    config: &'a MatchTransform,
    patterns: Vec<(Pattern<'a>, &'a Value)>,
}

impl<'a> Matcher<'a> {
    pub fn new(m: &'a MatchTransform) -> TransformResult<Self> {
        if m.fallback_to == MatchFallbackTo::Input && m.fallback_value.is_some() {
            return Err(TransformError::ConflictingFallback);
        }
        let mut patterns = Vec::with_capacity(m.patterns.len());
        for p in &m.patterns {
            let pattern = match p.kind {
                MatchPatternType::Literal => {
                    Pattern::Literal(p.literal.as_deref().ok_or(TransformError::MissingConfig {
                        kind: "match literal pattern",
                        field: "literal",
                    })?)
                }
                MatchPatternType::Regexp => {
                    let source = p.regexp.as_deref().ok_or(TransformError::MissingConfig {
                        kind: "match regexp pattern",
                        field: "regexp",
                    })?;
                    Pattern::Regexp(compile(source)?)
                }
            };
            patterns.push((pattern, &p.result));
        }
        Ok(Self {
            config: m,
            patterns,
        })
    }

    /// First matching pattern wins. Without a match the fallback value is
    /// returned, or the input itself under `fallbackTo: Input`, or `null`.
    pub fn apply(&self, input: Value) -> TransformResult<Value> {
        for (pattern, result) in &self.patterns {
            if pattern.is_hit(&input)? {
                return Ok((*result).clone());
            }
        }
        match self.config.fallback_to {
            MatchFallbackTo::Input => Ok(input),
            MatchFallbackTo::Value => Ok(self.config.fallback_value.clone().unwrap_or(Value::Null)),
        }
    }
}

/// Reject configurations that can never resolve.
pub fn validate(m: &MatchTransform) -> TransformResult<()> {
    Matcher::new(m).map(|_| ())
}

pub fn resolve(m: &MatchTransform, input: Value) -> TransformResult<Value> {
    Matcher::new(m)?.apply(input)
}
