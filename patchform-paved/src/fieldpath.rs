//! Field path parsing.
//!
//! A field path is a dot-separated list of field names with optional
//! bracketed suffixes: `[3]` is an array index, `[*]` every element, and any
//! other bracketed text a field name that may itself contain dots
//! (`metadata.annotations[example.org/name]`).

use crate::error::PathError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Field(String),
    Index(usize),
    Wildcard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let err = |reason: &str| PathError::Parse {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut field = String::new();
        let mut chars = path.chars();
        let mut after_bracket = false;
        let mut pending_dot = false;

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if field.is_empty() && !after_bracket {
                        return Err(err("empty field name"));
                    }
                    if !field.is_empty() {
                        segments.push(Segment::Field(std::mem::take(&mut field)));
                    }
                    after_bracket = false;
                    pending_dot = true;
                }
                '[' => {
                    if pending_dot {
                        return Err(err("empty field name"));
                    }
                    if !field.is_empty() {
                        segments.push(Segment::Field(std::mem::take(&mut field)));
                    }
                    let mut inner = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        inner.push(c);
                    }
                    if !closed {
                        return Err(err("unterminated '['"));
                    }
                    if inner.is_empty() {
                        return Err(err("empty brackets"));
                    }
                    segments.push(classify(inner));
                    after_bracket = true;
                }
                ']' => return Err(err("unexpected ']'")),
                _ => {
                    if after_bracket {
                        return Err(err("expected '.' or '[' after ']'"));
                    }
                    field.push(c);
                    pending_dot = false;
                }
            }
        }

        if pending_dot {
            return Err(err("trailing '.'"));
        }
        if !field.is_empty() {
            segments.push(Segment::Field(field));
        }

        Ok(Self { segments })
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True for the empty path, which addresses the whole document.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Wildcard))
    }

    /// The first `len` segments.
    pub fn prefix(&self, len: usize) -> FieldPath {
        Self {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }
}

fn classify(inner: String) -> Segment {
    if inner == "*" {
        return Segment::Wildcard;
    }
    if inner.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(i) = inner.parse::<usize>() {
            return Segment::Index(i);
        }
    }
    Segment::Field(inner)
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                Segment::Field(name) if name.contains(['.', '[', ']']) => write!(f, "[{name}]")?,
                Segment::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Index(idx) => write!(f, "[{idx}]")?,
                Segment::Wildcard => f.write_str("[*]")?,
            }
        }
        Ok(())
    }
}
