//! Whitespace canonicalization and label precedence.

/// Collapse every whitespace run to a single space and trim. An empty result
/// is reported as absent rather than as an empty string.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    let compact = value?.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.is_empty() {
        None
    } else {
        Some(compact)
    }
}

/// Convenience wrapper for callers holding a plain `&str`.
pub fn normalize_str(value: &str) -> Option<String> {
    normalize_text(Some(value))
}

/// Pick the first non-empty label source in fixed precedence order:
/// `<label for>`, wrapping `<label>`, `aria-label`, then `placeholder`.
pub fn resolve_field_label(
    label_for: Option<&str>,
    label_wrapped: Option<&str>,
    aria_label: Option<&str>,
    placeholder: Option<&str>,
) -> Option<String> {
    [label_for, label_wrapped, aria_label, placeholder]
        .into_iter()
        .find_map(normalize_text)
}

/// Build an ordinal sort key, treating absent values as empty strings.
pub fn sort_key<const N: usize>(values: [Option<&str>; N]) -> [&str; N] {
    values.map(|value| value.unwrap_or(""))
}
