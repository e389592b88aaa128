use crate::json::tokenizer::{tokenize_array, tokenize_object};

/// Render normalized object text one field per line, tab indented.
///
/// Keys are printed without quotes; empty composites stay on one line.
pub fn pretty_object(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    write_object(&mut out, json, 0);
    out
}

fn write_value(out: &mut String, value: &str, depth: usize) {
    match value.as_bytes().first() {
        Some(b'{') => write_object(out, value, depth),
        Some(b'[') => write_array(out, value, depth),
        _ => out.push_str(value),
    }
}

fn write_object(out: &mut String, json: &str, depth: usize) {
    let tokens = tokenize_object(json);
    if tokens.is_empty() {
        out.push_str("{}");
        return;
    }

    out.push('{');
    for (i, pair) in tokens.chunks_exact(2).enumerate() {
        if i > 0 {
            out.push(',');
        }
        newline(out, depth + 1);
        out.push_str(pair[0]);
        out.push_str(": ");
        write_value(out, pair[1], depth + 1);
    }
    newline(out, depth);
    out.push('}');
}

fn write_array(out: &mut String, json: &str, depth: usize) {
    let tokens = tokenize_array(json);
    if tokens.is_empty() {
        out.push_str("[]");
        return;
    }

    out.push('[');
    for (i, element) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        newline(out, depth + 1);
        write_value(out, element, depth + 1);
    }
    newline(out, depth);
    out.push(']');
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push('\t');
    }
}
