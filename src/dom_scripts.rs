//! In-page walker script embedding.
//!
//! The walker lives in its own `.js` file so editors can highlight it; it is
//! bundled as a string at compile time and handed verbatim to a
//! [`ScriptEvaluator`](crate::extractor::ScriptEvaluator).

/// Embedded contents of `scripts/extract_semantics.js`.
pub const EXTRACT_SEMANTICS_SCRIPT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/scripts/extract_semantics.js"
));

/// Return the embedded walker script.
pub fn extract_semantics_script() -> &'static str {
    EXTRACT_SEMANTICS_SCRIPT
}
