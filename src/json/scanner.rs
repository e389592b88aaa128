//! Quote and bracket matching over raw JSON text.
//!
//! Every other module in `json` slices text using the indices these two
//! functions return. Indices are byte offsets; all delimiters are ASCII so
//! slicing at them always lands on a char boundary.

/// Index of the quote closing the string that opens at `open`.
///
/// A backslash always consumes the byte after it, whatever it is.
pub fn match_quote(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'"') {
        return None;
    }

    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Index of the delimiter closing the `[`, `{` or `(` at `open`.
///
/// Only delimiters of the same kind change the depth, and quoted spans are
/// skipped whole.
pub fn match_bracket(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let opener = *bytes.get(open)?;
    let closer = match opener {
        b'[' => b']',
        b'{' => b'}',
        b'(' => b')',
        _ => return None,
    };

    let mut depth = 1usize;
    let mut i = open + 1;
    while i < bytes.len() {
        let c = bytes[i];
        if c == b'"' {
            i = match_quote(text, i)?;
        } else if c == opener {
            depth += 1;
        } else if c == closer {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// End (exclusive) of the value starting at `start`, stopping a bare
/// scalar at the first byte in `stops`.
pub(crate) fn value_end(text: &str, start: usize, stops: &[u8]) -> Option<usize> {
    let bytes = text.as_bytes();
    match bytes.get(start)? {
        b'"' => match_quote(text, start).map(|i| i + 1),
        b'[' | b'{' => match_bracket(text, start).map(|i| i + 1),
        _ => {
            let mut i = start + 1;
            while i < bytes.len() && !stops.contains(&bytes[i]) {
                i += 1;
            }
            Some(i)
        }
    }
}

/// Split `text` at every `sep` that sits outside quotes and brackets.
///
/// An unmatched quote or bracket makes the rest of the text one piece, so
/// the caller sees the broken member and can report on it.
pub(crate) fn split_top_level(text: &str, sep: u8) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut front = 0;
    let mut i = 0;

    while i < bytes.len() {
        let skip_to = match bytes[i] {
            b'"' => match_quote(text, i),
            b'[' | b'{' => match_bracket(text, i),
            c if c == sep => {
                pieces.push(&text[front..i]);
                front = i + 1;
                Some(i)
            }
            _ => Some(i),
        };
        match skip_to {
            Some(next) => i = next + 1,
            None => break,
        }
    }
    pieces.push(&text[front..]);
    pieces
}

/// Position of the first `target` outside quotes and brackets
pub(crate) fn find_top_level(text: &str, target: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            c if c == target => return Some(i),
            b'"' => i = match_quote(text, i)?,
            b'[' | b'{' => i = match_bracket(text, i)?,
            _ => {}
        }
        i += 1;
    }
    None
}
