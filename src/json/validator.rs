//! Syntactic checks for normalized JSON text.
//!
//! object := `{}` | `{` "key" `:` value (`,` "key" `:` value)* `}`
//! array  := `[]` | `[` value (`,` value)* `]`
//! value  := string | number | true | false | null | object | array
//!
//! Patches may also use the `delete` literal and indexed array entries
//! (`[2:value]`); documents may not.

use crate::core::error::{Error, ErrorKind, Result};
use crate::json::scanner::{match_bracket, match_quote, split_top_level};

pub const DELETE: &str = "delete";

/// Validate text as a document: an object, `delete` not allowed
pub fn validate_document(json: &str) -> Result<()> {
    Grammar { patch: false }.check(json)
}

/// Validate text as a patch: an object that may contain `delete` values
/// and indexed array entries
pub fn validate_patch(json: &str) -> Result<()> {
    Grammar { patch: true }.check(json)
}

/// Whether `text` is an indexed array patch such as `[3:"x"]`
pub fn is_indexed_array(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'[') {
        return false;
    }
    let digits = bytes[1..].iter().take_while(|b| b.is_ascii_digit()).count();
    digits > 0 && bytes.get(1 + digits) == Some(&b':')
}

/// Split an indexed entry `n:value` into its index text and value
pub(crate) fn split_indexed_entry(entry: &str) -> Option<(&str, &str)> {
    let colon = entry.find(':')?;
    let (index, value) = (&entry[..colon], &entry[colon + 1..]);
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((index, value))
}

struct Grammar {
    patch: bool,
}

type Verdict = std::result::Result<(), String>;

impl Grammar {
    fn check(&self, json: &str) -> Result<()> {
        if json.is_empty() {
            return Err(Error::new(ErrorKind::Parse, "json is an empty string".to_string()));
        }
        self.object(json).map_err(|reason| {
            Error::new(ErrorKind::Parse, format!("json verification failed: {}", reason))
        })
    }

    fn object(&self, data: &str) -> Verdict {
        if data == "{}" {
            return Ok(());
        }
        if !data.starts_with('{') {
            return Err("missing opening brace".to_string());
        }
        if match_bracket(data, 0) != Some(data.len() - 1) {
            return Err("missing closing brace".to_string());
        }

        let members = split_top_level(&data[1..data.len() - 1], b',');
        let count = members.len();
        for (i, member) in members.into_iter().enumerate() {
            if member.is_empty() {
                return Err(if i + 1 == count && count > 1 {
                    "trailing comma in object".to_string()
                } else {
                    "missing key/value pair".to_string()
                });
            }
            self.member(member)?;
        }
        Ok(())
    }

    fn member(&self, member: &str) -> Verdict {
        if !member.starts_with('"') {
            return Err(format!("object member {} key missing initial quote", member));
        }
        let Some(key_close) = match_quote(member, 0) else {
            return Err(format!("object member {} key missing final quote", member));
        };
        if member.as_bytes().get(key_close + 1) != Some(&b':') {
            return Err(format!("object member {} missing ':' delimiter", member));
        }
        let value = &member[key_close + 2..];
        if value.is_empty() {
            return Err(format!("object member {} missing value", member));
        }
        self.value(value)
            .map_err(|reason| format!("object value {}: {}", &member[..key_close + 1], reason))
    }

    fn array(&self, data: &str) -> Verdict {
        if data == "[]" {
            return Ok(());
        }
        if !data.starts_with('[') {
            return Err("missing opening bracket".to_string());
        }
        if match_bracket(data, 0) != Some(data.len() - 1) {
            return Err("missing closing bracket".to_string());
        }

        let indexed = self.patch && is_indexed_array(data);
        let elements = split_top_level(&data[1..data.len() - 1], b',');
        let count = elements.len();
        for (i, element) in elements.into_iter().enumerate() {
            if element.is_empty() {
                return Err(if i + 1 == count && count > 1 {
                    "trailing comma in array".to_string()
                } else {
                    "missing array element".to_string()
                });
            }
            let element = if indexed {
                match split_indexed_entry(element) {
                    Some((_, value)) if !value.is_empty() => value,
                    _ => return Err(format!("malformed indexed array entry {}", element)),
                }
            } else {
                element
            };
            self.value(element)
                .map_err(|reason| format!("array element {}: {}", element, reason))?;
        }
        Ok(())
    }

    fn value(&self, data: &str) -> Verdict {
        match data.as_bytes()[0] {
            b'"' => {
                if match_quote(data, 0) != Some(data.len() - 1) {
                    return Err("missing final quote".to_string());
                }
                Ok(())
            }
            b'{' => self.object(data),
            b'[' => self.array(data),
            b'-' | b'0'..=b'9' => number(data),
            _ => match data {
                "true" | "false" | "null" => Ok(()),
                DELETE if self.patch => Ok(()),
                DELETE => Err("delete is only allowed in patches".to_string()),
                _ if data.contains('"') => Err("missing initial quote".to_string()),
                _ => Err(format!("cannot verify type of {}", data)),
            },
        }
    }
}

/// `-? digits (. digits)? ([eE] [+-]? digits)?`
fn number(data: &str) -> Verdict {
    let bytes = data.as_bytes();
    let mut i = 0;

    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    if bytes[i] == b'-' {
        i += 1;
    }
    let whole = digits(i);
    if whole == 0 {
        return Err("missing digits in number".to_string());
    }
    i += whole;

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let fraction = digits(i);
        if fraction == 0 {
            return Err("missing digits after decimal point".to_string());
        }
        i += fraction;
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let exponent = digits(i);
        if exponent == 0 {
            return Err("missing exponent digits".to_string());
        }
        i += exponent;
    }

    if i != bytes.len() {
        return Err("non-numeric character in number".to_string());
    }
    Ok(())
}
