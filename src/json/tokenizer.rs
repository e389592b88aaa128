//! One-level splitting of normalized objects and arrays, and the inverse.
//!
//! Input is assumed to have passed validation; malformed text gives
//! unspecified (but panic-free) splits.

use crate::core::error::{Error, ErrorKind, Result};
use crate::json::scanner::{match_quote, value_end};

pub const EMPTY_OBJECT: &str = "{}";
pub const EMPTY_ARRAY: &str = "[]";

/// Split `{...}` into `[key1, value1, key2, value2, ...]`.
///
/// Keys come back without their quotes, values exactly as written.
pub fn tokenize_object(json: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    if json.is_empty() || json == EMPTY_OBJECT {
        return tokens;
    }

    let last = json.len() - 1;
    let mut back = 0;
    while back < last {
        let key_open = back + 1;
        let Some(key_close) = match_quote(json, key_open) else {
            break;
        };
        // skip the ':'
        let value_start = key_close + 2;
        let Some(value_stop) = value_end(json, value_start, b",}") else {
            break;
        };
        if value_stop > json.len() {
            break;
        }
        tokens.push(&json[key_open + 1..key_close]);
        tokens.push(&json[value_start..value_stop]);
        back = value_stop;
    }
    tokens
}

/// Split `[...]` into its raw elements
pub fn tokenize_array(json: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    if json.is_empty() || json == EMPTY_ARRAY {
        return tokens;
    }

    let last = json.len() - 1;
    let mut back = 0;
    while back < last {
        let front = back + 1;
        let Some(stop) = value_end(json, front, b",]") else {
            break;
        };
        if stop > json.len() {
            break;
        }
        tokens.push(&json[front..stop]);
        back = stop;
    }
    tokens
}

/// Join alternating keys and raw values back into object text.
///
/// Keys are quoted on the way out. An odd number of tokens is an error.
pub fn smash_object<S: AsRef<str>>(tokens: &[S]) -> Result<String> {
    if tokens.is_empty() {
        return Ok(EMPTY_OBJECT.to_string());
    }
    if tokens.len() % 2 == 1 {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            format!("unbalanced fields: {} tokens cannot form key/value pairs", tokens.len()),
        ));
    }

    let size: usize = tokens.iter().map(|t| t.as_ref().len() + 2).sum();
    let mut out = String::with_capacity(size + 2);
    out.push('{');
    for (i, pair) in tokens.chunks_exact(2).enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(pair[0].as_ref());
        out.push_str("\":");
        out.push_str(pair[1].as_ref());
    }
    out.push('}');
    Ok(out)
}

/// Join raw elements back into array text
pub fn smash_array<S: AsRef<str>>(tokens: &[S]) -> String {
    if tokens.is_empty() {
        return EMPTY_ARRAY.to_string();
    }

    let mut out = String::from("[");
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(token.as_ref());
    }
    out.push(']');
    out
}
