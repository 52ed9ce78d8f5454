//! Data structures shared across the extraction pipeline.
//!
//! `raw` holds the untyped walker output after boundary validation; `summary`
//! holds the immutable, signed entities every later stage consumes.

pub mod raw;
pub mod summary;

pub use raw::{RawAction, RawField, RawForm, RawPage};
pub use summary::{
    ActionIdentity, FieldSummary, FormSummary, InteractiveElement, PageSummary, SCHEMA_VERSION,
};
