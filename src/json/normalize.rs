use crate::json::scanner::match_quote;

/// Drop spaces, tabs, carriage returns and newlines outside string literals.
///
/// Quoted spans are copied verbatim; an unterminated quote keeps the rest
/// of the input as is. Running it twice gives the same text.
pub fn de_whitespace(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut run_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => match match_quote(text, i) {
                Some(close) => i = close + 1,
                None => i = bytes.len(),
            },
            b' ' | b'\t' | b'\r' | b'\n' => {
                out.push_str(&text[run_start..i]);
                i += 1;
                run_start = i;
            }
            _ => i += 1,
        }
    }
    out.push_str(&text[run_start..]);
    out
}
