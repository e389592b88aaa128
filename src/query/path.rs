//! Field paths: `"a"."b"[2]."c"`.
//!
//! A quoted step selects an object key, a bracketed step an array index.
//! Dots between steps are optional.

use std::fmt;
use crate::core::error::{Error, ErrorKind, Result};
use crate::json::scanner::{match_bracket, match_quote};
use crate::json::view::{array_element, object_field};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    Key(String),   // raw key text, escapes kept
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    steps: Vec<PathStep>,
}

impl FieldPath {
    /// Parse a normalized path expression
    pub fn parse(expr: &str) -> Result<Self> {
        let bytes = expr.as_bytes();
        let mut steps = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'.' && !steps.is_empty() {
                i += 1;
            }
            match bytes.get(i) {
                Some(b'"') => {
                    let close = match_quote(expr, i).ok_or_else(|| syntax(expr, "unterminated key"))?;
                    steps.push(PathStep::Key(expr[i + 1..close].to_string()));
                    i = close + 1;
                }
                Some(b'[') => {
                    let close = match_bracket(expr, i).ok_or_else(|| syntax(expr, "unterminated index"))?;
                    let digits = &expr[i + 1..close];
                    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(syntax(expr, "index must be a non-negative integer"));
                    }
                    let index = digits.parse().map_err(|_| syntax(expr, "index out of range"))?;
                    steps.push(PathStep::Index(index));
                    i = close + 1;
                }
                _ => return Err(syntax(expr, "expected a quoted key or a bracketed index")),
            }
        }

        if steps.is_empty() {
            return Err(syntax(expr, "empty path"));
        }
        Ok(FieldPath { steps })
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Walk the path through object text and return the target's raw text
    pub fn resolve<'a>(&self, json: &'a str) -> Result<&'a str> {
        let mut current = json;
        for step in &self.steps {
            current = match step {
                PathStep::Key(key) => {
                    if !current.starts_with('{') {
                        return Err(Error::new(
                            ErrorKind::TypeMismatch,
                            format!("path {}: key \"{}\" applied to non-object {}", self, key, current),
                        ));
                    }
                    object_field(current, key)?
                }
                PathStep::Index(index) => {
                    if !current.starts_with('[') {
                        return Err(Error::new(
                            ErrorKind::TypeMismatch,
                            format!("path {}: index [{}] applied to non-array {}", self, index, current),
                        ));
                    }
                    array_element(current, *index)?
                }
            };
        }
        Ok(current)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "\"{}\"", key)?;
                }
                PathStep::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

fn syntax(expr: &str, reason: &str) -> Error {
    Error::new(ErrorKind::InvalidArgument, format!("bad path {}: {}", expr, reason))
}
