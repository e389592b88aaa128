//! Recursive merge of a patch object into a target object, both normalized.
//!
//! For each patch key:
//! - `delete` removes the key from the target (no-op when absent)
//! - an object merges into an object already stored under the key
//! - an indexed array (`[i:value,...]`) patches single elements of a stored array
//! - anything else replaces the stored value
//!
//! Keys the target lacks are appended after its existing fields.

use crate::core::error::{Error, ErrorKind, Result};
use crate::json::scanner::split_top_level;
use crate::json::tokenizer::{smash_array, smash_object, tokenize_array, tokenize_object, EMPTY_ARRAY, EMPTY_OBJECT};
use crate::json::validator::{is_indexed_array, split_indexed_entry, DELETE};

/// Merge `patch` into `target` and return the new object text
pub fn merge_object(target: &str, patch: &str) -> Result<String> {
    let mut fields: Vec<String> = tokenize_object(target).into_iter().map(str::to_string).collect();

    for pair in tokenize_object(patch).chunks_exact(2) {
        let (key, value) = (pair[0], pair[1]);
        let mut found = false;
        let mut j = 0;
        while j < fields.len() {
            if fields[j] != key {
                j += 2;
                continue;
            }
            found = true;
            if value == DELETE {
                fields.drain(j..j + 2);
                continue;
            }
            fields[j + 1] = merge_value(&fields[j + 1], value)?;
            j += 2;
        }

        if !found && value != DELETE {
            fields.push(key.to_string());
            fields.push(materialize(value)?);
        }
    }

    smash_object(&fields)
}

/// Apply an indexed array patch to array text.
///
/// Indices refer to positions in `target` before the patch; an index equal
/// to the current length appends.
pub fn merge_array(target: &str, patch: &str) -> Result<String> {
    let mut elements: Vec<Option<String>> = tokenize_array(target)
        .into_iter()
        .map(|e| Some(e.to_string()))
        .collect();
    let original_len = elements.len();

    if !is_indexed_array(patch) || !patch.ends_with(']') {
        return Err(Error::new(ErrorKind::InvalidArgument, format!("{} is not an indexed array patch", patch)));
    }
    let inner = &patch[1..patch.len() - 1];
    for entry in split_top_level(inner, b',') {
        let (index, value) = split_indexed_entry(entry).ok_or_else(|| {
            Error::new(ErrorKind::InvalidArgument, format!("malformed indexed array entry {}", entry))
        })?;
        let index: usize = index.parse().map_err(|_| {
            Error::new(ErrorKind::InvalidArgument, format!("array patch index {} is too large", index))
        })?;

        if index < original_len {
            let slot = &mut elements[index];
            *slot = match (slot.take(), value) {
                (_, DELETE) => None,
                (Some(current), _) => Some(merge_value(&current, value)?),
                (None, _) => Some(materialize(value)?),
            };
        } else if index == elements.len() {
            if value != DELETE {
                elements.push(Some(materialize(value)?));
            }
        } else {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("array patch index {} out of bounds for array of length {}", index, elements.len()),
            ));
        }
    }

    let kept: Vec<String> = elements.into_iter().flatten().collect();
    Ok(smash_array(&kept))
}

fn merge_value(current: &str, patch: &str) -> Result<String> {
    if patch.starts_with('{') && current.starts_with('{') {
        return merge_object(current, patch);
    }
    if is_indexed_array(patch) {
        if !current.starts_with('[') {
            return Err(Error::new(
                ErrorKind::TypeMismatch,
                format!("indexed array patch {} applied to non-array value {}", patch, current),
            ));
        }
        return merge_array(current, patch);
    }
    materialize(patch)
}

/// A patch value stored where nothing compatible exists yet; nested
/// `delete` markers and indexed arrays are resolved against empty values.
fn materialize(patch: &str) -> Result<String> {
    if patch.starts_with('{') {
        merge_object(EMPTY_OBJECT, patch)
    } else if is_indexed_array(patch) {
        merge_array(EMPTY_ARRAY, patch)
    } else {
        Ok(patch.to_string())
    }
}
