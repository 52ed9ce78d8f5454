//! Typed failures surfaced at the extraction pipeline boundary.
//!
//! Every internal failure (script evaluation, raw-record validation,
//! transformation, browser lifecycle) is collapsed into a single
//! [`ExtractionError`] carrying a machine-readable [`ErrorCode`] and a human
//! readable message. Callers never see the lower-level error types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Machine-readable failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ExtractionFailed,
    SchemaValidationFailed,
    UrlExtractionFailed,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ExtractionFailed => "EXTRACTION_FAILED",
            ErrorCode::SchemaValidationFailed => "SCHEMA_VALIDATION_FAILED",
            ErrorCode::UrlExtractionFailed => "URL_EXTRACTION_FAILED",
        }
    }
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::ExtractionFailed
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single failure channel of the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct ExtractionError {
    pub code: ErrorCode,
    pub message: String,
}

impl ExtractionError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Failure while invoking the in-page walker.
    pub fn browser(err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ExtractionFailed,
            format!("Browser extraction failed: {err}"),
        )
    }

    /// The walker output did not match the expected record shape.
    pub fn schema(err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::SchemaValidationFailed,
            format!("Schema validation failed: {err}"),
        )
    }

    /// Any other failure while turning raw records into a summary.
    pub fn semantic(err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ExtractionFailed,
            format!("Semantic extraction failed: {err}"),
        )
    }

    /// Failure while driving a browser to a URL, including anything raised
    /// by the pipeline during that run.
    pub fn url(err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::UrlExtractionFailed,
            format!("URL extraction failed: {err}"),
        )
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn to_value(&self) -> Value {
        json!({
            "code": self.code.as_str(),
            "message": self.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_as_screaming_snake_case() {
        let value = serde_json::to_value(ErrorCode::SchemaValidationFailed).unwrap();
        assert_eq!(value, json!("SCHEMA_VALIDATION_FAILED"));
        assert_eq!(ErrorCode::default(), ErrorCode::ExtractionFailed);
    }

    #[test]
    fn constructors_pick_codes_and_prefixes() {
        let err = ExtractionError::schema("missing field `forms`");
        assert_eq!(err.code(), ErrorCode::SchemaValidationFailed);
        assert!(err.message().starts_with("Schema validation failed:"));

        let err = ExtractionError::url("navigation timed out");
        assert_eq!(err.code(), ErrorCode::UrlExtractionFailed);
        assert_eq!(
            err.to_value(),
            json!({
                "code": "URL_EXTRACTION_FAILED",
                "message": "URL extraction failed: navigation timed out",
            })
        );
    }

    #[test]
    fn display_includes_code() {
        let err = ExtractionError::browser("target closed");
        assert_eq!(
            err.to_string(),
            "[EXTRACTION_FAILED] Browser extraction failed: target closed"
        );
    }
}
