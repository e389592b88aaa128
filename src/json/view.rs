//! Typed access to raw value text.
//!
//! `JsonObject` and `JsonArray` are throwaway views: each owns a copy of the
//! text it was cut from and re-tokenizes on every lookup. Strings keep their
//! quotes (`"foo"` comes back as `"\"foo\""`) so values round-trip unchanged.

use std::fmt;
use crate::core::error::{Error, ErrorKind, Result};
use crate::json::scanner::match_quote;
use crate::json::tokenizer::{tokenize_array, tokenize_object};

/// Conversion from a raw JSON value to a Rust type, decided by the value's
/// leading character (and literal content for booleans).
pub trait FromJson: Sized {
    /// Name used in type-mismatch errors
    const EXPECTED: &'static str;

    fn from_json(raw: &str) -> Result<Self>;
}

fn mismatch(raw: &str, expected: &str) -> Error {
    Error::new(ErrorKind::TypeMismatch, format!("field {} is not {}", raw, expected))
}

fn is_numeric_shape(raw: &str) -> bool {
    !(raw.is_empty()
        || raw.starts_with('"')
        || raw.starts_with('[')
        || raw.starts_with('{')
        || matches!(raw, "true" | "false" | "null"))
}

impl FromJson for String {
    const EXPECTED: &'static str = "a string";

    fn from_json(raw: &str) -> Result<Self> {
        if raw.starts_with('"') && match_quote(raw, 0) == Some(raw.len() - 1) {
            Ok(raw.to_string())
        } else {
            Err(mismatch(raw, Self::EXPECTED))
        }
    }
}

impl FromJson for f64 {
    const EXPECTED: &'static str = "a number";

    fn from_json(raw: &str) -> Result<Self> {
        if !is_numeric_shape(raw) {
            return Err(mismatch(raw, Self::EXPECTED));
        }
        raw.parse::<f64>().map_err(|_| mismatch(raw, Self::EXPECTED))
    }
}

impl FromJson for i64 {
    const EXPECTED: &'static str = "a number";

    /// Parsed as a float, then truncated toward zero
    fn from_json(raw: &str) -> Result<Self> {
        f64::from_json(raw).map(|n| n as i64)
    }
}

impl FromJson for bool {
    const EXPECTED: &'static str = "a bool";

    fn from_json(raw: &str) -> Result<Self> {
        match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(mismatch(raw, Self::EXPECTED)),
        }
    }
}

impl FromJson for JsonObject {
    const EXPECTED: &'static str = "an object";

    fn from_json(raw: &str) -> Result<Self> {
        if raw.starts_with('{') {
            Ok(JsonObject::new(raw))
        } else {
            Err(mismatch(raw, Self::EXPECTED))
        }
    }
}

impl FromJson for JsonArray {
    const EXPECTED: &'static str = "an array";

    fn from_json(raw: &str) -> Result<Self> {
        if raw.starts_with('[') {
            Ok(JsonArray::new(raw))
        } else {
            Err(mismatch(raw, Self::EXPECTED))
        }
    }
}

/// Raw text of `key` inside object text
pub(crate) fn object_field<'a>(data: &'a str, key: &str) -> Result<&'a str> {
    let tokens = tokenize_object(data);
    tokens
        .chunks_exact(2)
        .find(|pair| pair[0] == key)
        .map(|pair| pair[1])
        .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("field \"{}\" does not exist", key)))
}

/// Raw text of element `index` inside array text
pub(crate) fn array_element(data: &str, index: usize) -> Result<&str> {
    let tokens = tokenize_array(data);
    let len = tokens.len();
    tokens.get(index).copied().ok_or_else(|| {
        Error::new(
            ErrorKind::NotFound,
            format!("index {} out of bounds for array of length {}", index, len),
        )
    })
}

/// View over an object value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonObject {
    data: String,
}

impl JsonObject {
    pub fn new(data: impl Into<String>) -> Self {
        JsonObject { data: data.into() }
    }

    pub fn get<T: FromJson>(&self, key: &str) -> Result<T> {
        T::from_json(self.raw(key)?)
    }

    pub fn raw(&self, key: &str) -> Result<&str> {
        object_field(&self.data, key)
    }

    pub fn is_null(&self, key: &str) -> Result<bool> {
        Ok(self.raw(key)? == "null")
    }

    pub fn keys(&self) -> Vec<&str> {
        tokenize_object(&self.data).into_iter().step_by(2).collect()
    }

    pub fn len(&self) -> usize {
        tokenize_object(&self.data).len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }
}

impl fmt::Display for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.data)
    }
}

/// View over an array value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonArray {
    data: String,
}

impl JsonArray {
    pub fn new(data: impl Into<String>) -> Self {
        JsonArray { data: data.into() }
    }

    pub fn get<T: FromJson>(&self, index: usize) -> Result<T> {
        T::from_json(self.raw(index)?)
    }

    pub fn raw(&self, index: usize) -> Result<&str> {
        array_element(&self.data, index)
    }

    pub fn is_null(&self, index: usize) -> Result<bool> {
        Ok(self.raw(index)? == "null")
    }

    pub fn len(&self) -> usize {
        tokenize_array(&self.data).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }
}

impl fmt::Display for JsonArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.data)
    }
}
