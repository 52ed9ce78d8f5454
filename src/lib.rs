//! Deterministic, content-addressed semantic summaries of rendered web pages.
//!
//! An in-page walker collects headers, forms and actionable elements; the host
//! side normalizes them, signs each entity with a SHA-256 over canonical JSON,
//! and orders every collection by content. Derived views (deduplicated
//! actionable elements, intent-ranked matches, compact payloads) are built
//! from the resulting [`PageSummary`].

pub mod actionable;
pub mod adapter;
pub mod builder;
pub mod config;
pub mod dom_scripts;
pub mod error;
pub mod extractor;
pub mod intent;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod runtime;
pub mod signature;
pub mod similarity;
pub mod types;

pub use actionable::{
    dedupe_actionable_elements, extract_actionable_elements, merge_actionable_elements,
};
pub use builder::build_page_summary;
pub use config::{ExtractorConfig, ExtractorConfigOverrides, Verbosity, WaitUntil};
pub use error::{ErrorCode, ExtractionError};
pub use extractor::{
    EvaluateError, Extractor, ScriptEvaluator, UrlExtraction, extract_from_url,
    extract_page_semantics,
};
pub use intent::{
    DEFAULT_MIN_SCORE, RankedActionableElement, filter_actionable_elements,
    filter_actionable_from_summary, rank_actionable_elements,
};
pub use output::{
    OutputFormat, OutputOptions, build_output_payload, compact_actionable_payload,
    decode_compact_payload, render_payload, strip_fields,
};
pub use types::{FieldSummary, FormSummary, InteractiveElement, PageSummary, SCHEMA_VERSION};
