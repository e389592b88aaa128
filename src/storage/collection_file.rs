//! Collection files for save/load.
//!
//! Written as a tab-indented array, one document per line. Read back either
//! in that form or as a stream of top-level objects with nothing between
//! them but whitespace.

use std::fs;
use std::path::Path;
use crate::core::document::Document;
use crate::core::error::{Error, ErrorKind, Result};
use crate::json::normalize::de_whitespace;
use crate::json::scanner::match_bracket;
use crate::json::tokenizer::tokenize_array;

pub fn write_collection(path: &Path, documents: &[Document]) -> Result<()> {
    let body: Vec<String> = documents.iter().map(|doc| format!("\t{}", doc.as_str())).collect();
    let mut out = String::from("[\n");
    if !body.is_empty() {
        out.push_str(&body.join(",\n"));
        out.push('\n');
    }
    out.push(']');

    fs::write(path, out)?;
    Ok(())
}

/// Raw document texts of a collection file, not yet validated
pub fn read_collection(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    let corrupt = |reason: String| {
        Error::new(ErrorKind::Parse, format!("collection file {}: {}", path.display(), reason))
    };

    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        let normalized = de_whitespace(trimmed);
        if match_bracket(&normalized, 0) != Some(normalized.len() - 1) {
            return Err(corrupt("unterminated document array".to_string()));
        }
        return Ok(tokenize_array(&normalized).into_iter().map(str::to_string).collect());
    }

    let mut entries = Vec::new();
    let mut rest = trimmed;
    while !rest.is_empty() {
        if !rest.starts_with('{') {
            return Err(corrupt(format!("expected an object, found {:?}", rest.chars().next())));
        }
        let close = match_bracket(rest, 0).ok_or_else(|| corrupt("unterminated object".to_string()))?;
        entries.push(rest[..=close].to_string());
        rest = rest[close + 1..].trim_start();
    }
    Ok(entries)
}
