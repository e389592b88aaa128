//! Spill file for an inactive collection: one JSON object keyed by id.
//!
//! ```text
//! {
//! "0":{"name":"a"},
//! "3":{"name":"b"}
//! }
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use crate::core::document::Document;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;
use crate::json::normalize::de_whitespace;
use crate::json::scanner::match_bracket;
use crate::json::tokenizer::tokenize_object;

pub fn write_cache(path: &Path, documents: &[Document]) -> Result<()> {
    let mut out = String::from("{\n");
    for (i, doc) in documents.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        let _ = write!(out, "\"{}\":{}", doc.id(), doc.as_str());
    }
    if !documents.is_empty() {
        out.push('\n');
    }
    out.push('}');

    fs::write(path, out)?;
    Ok(())
}

/// Documents of a cache file, ids preserved, in file order
pub fn read_cache(path: &Path) -> Result<Vec<Document>> {
    let text = de_whitespace(&fs::read_to_string(path)?);
    let corrupt = |reason: &str| {
        Error::new(ErrorKind::Parse, format!("cache file {}: {}", path.display(), reason))
    };

    if !text.starts_with('{') || match_bracket(&text, 0) != Some(text.len() - 1) {
        return Err(corrupt("not a single object"));
    }

    let tokens = tokenize_object(&text);
    if tokens.len() % 2 != 0 {
        return Err(corrupt("dangling key"));
    }
    tokens
        .chunks_exact(2)
        .map(|pair| {
            let id: u64 = pair[0].parse().map_err(|_| corrupt(&format!("bad id \"{}\"", pair[0])))?;
            Document::with_id(DocId(id), pair[1]).map_err(|e| e.within(&format!("cache entry {}", id)))
        })
        .collect()
}
