//! Content-addressed identities for page entities.
//!
//! Every signature is the lowercase hex SHA-256 of a canonical JSON encoding
//! of the entity's normalized semantic fields: object keys sorted, no
//! incidental whitespace, and every non-ASCII code point escaped as `\uXXXX`
//! (UTF-16 units). Nothing positional ever enters the hash.

use std::fmt::Write as _;

use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use crate::normalize::normalize_text;

/// Encode `value` as canonical JSON text.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

/// SHA-256 over the canonical JSON encoding of `value`.
pub fn sha256_canonical(value: &Value) -> String {
    let digest = Sha256::digest(canonical_json(value).as_bytes());
    format!("{digest:x}")
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => {
            let _ = write!(out, "{number}");
        }
        Value::String(text) => write_string(text, out),
        Value::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (idx, (key, item)) in entries.into_iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

fn write_string(text: &str, out: &mut String) {
    out.push('"');
    let mut units = [0u16; 2];
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(ch),
            _ => {
                for unit in ch.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04x}");
                }
            }
        }
    }
    out.push('"');
}

/// Identity of a form field.
pub fn field_signature(
    label: Option<&str>,
    field_type: &str,
    section_context: Option<&str>,
) -> String {
    sha256_canonical(&json!({
        "label": normalize_text(label),
        "type": normalize_text(Some(field_type)).unwrap_or_else(|| "text".to_string()),
        "section_context": normalize_text(section_context),
    }))
}

/// Identity of an actionable element.
pub fn action_signature(
    visible_text: Option<&str>,
    role: &str,
    section_context: Option<&str>,
) -> String {
    sha256_canonical(&json!({
        "visible_text": normalize_text(visible_text),
        "role": normalize_text(Some(role)).unwrap_or_default(),
        "section_context": normalize_text(section_context),
    }))
}

/// Identity of a form, derived from the identities of its members.
pub fn form_signature(
    field_signatures: &[String],
    submit_signatures: &[String],
    section_context: Option<&str>,
) -> String {
    let mut fields = field_signatures.to_vec();
    fields.sort();
    let mut submits = submit_signatures.to_vec();
    submits.sort();
    sha256_canonical(&json!({
        "section_context": normalize_text(section_context),
        "field_signatures": fields,
        "submit_signatures": submits,
    }))
}

/// Identity of a whole page.
pub fn page_signature(
    title: &str,
    headers: &[String],
    forms_count: usize,
    interactive_count: usize,
) -> String {
    let mut headers: Vec<String> = headers
        .iter()
        .map(|header| normalize_text(Some(header)).unwrap_or_default())
        .collect();
    headers.sort();
    sha256_canonical(&json!({
        "title": normalize_text(Some(title)),
        "headers": headers,
        "forms_count": forms_count,
        "interactive_count": interactive_count,
    }))
}
