//! Extraction entry points.
//!
//! [`extract_page_semantics`] runs the walker through a [`ScriptEvaluator`]
//! and builds a [`PageSummary`] from its output. [`Extractor`] adds logging
//! and the URL flow: launch a browser, navigate, extract, project, shut down.

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;

use crate::builder::build_page_summary;
use crate::config::{ExtractorConfig, ExtractorConfigOverrides, WaitUntil};
use crate::dom_scripts::extract_semantics_script;
use crate::error::ExtractionError;
use crate::logging::{CATEGORY_EXTRACT, CATEGORY_NAVIGATE, ExtractionLogger};
use crate::output::{OutputOptions, build_output_payload};
use crate::runtime::BrowserSession;
use crate::types::PageSummary;

/// Failure reported by a script evaluation boundary.
#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("script threw: {0}")]
    Exception(String),
    #[error("evaluation transport failed: {0}")]
    Transport(String),
}

/// Runs a script in a page context and returns its JSON result.
///
/// This is the only suspend point of an extraction: one call, one value.
#[async_trait]
pub trait ScriptEvaluator: Send + Sync {
    async fn evaluate(&self, script: &str) -> Result<Value, EvaluateError>;
}

/// Evaluate the walker and build a summary. All-or-nothing.
pub async fn extract_page_semantics(
    evaluator: &dyn ScriptEvaluator,
) -> Result<PageSummary, ExtractionError> {
    let raw = evaluator
        .evaluate(extract_semantics_script())
        .await
        .map_err(ExtractionError::browser)?;
    build_page_summary(raw)
}

/// Result of a URL extraction: the typed summary, or a projected payload
/// when the options asked for one.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlExtraction {
    Summary(PageSummary),
    Payload(Value),
}

impl UrlExtraction {
    pub fn into_value(self) -> Value {
        match self {
            UrlExtraction::Summary(summary) => {
                build_output_payload(&summary, &OutputOptions::default())
            }
            UrlExtraction::Payload(payload) => payload,
        }
    }

    pub fn summary(&self) -> Option<&PageSummary> {
        match self {
            UrlExtraction::Summary(summary) => Some(summary),
            UrlExtraction::Payload(_) => None,
        }
    }
}

/// Configured extraction facade.
#[derive(Debug)]
pub struct Extractor {
    config: ExtractorConfig,
    logger: ExtractionLogger,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let logger = ExtractionLogger::new(config.verbose);
        Self { config, logger }
    }

    pub fn with_logger(config: ExtractorConfig, logger: ExtractionLogger) -> Self {
        Self { config, logger }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// [`extract_page_semantics`] with stage logging.
    pub async fn extract(
        &self,
        evaluator: &dyn ScriptEvaluator,
    ) -> Result<PageSummary, ExtractionError> {
        self.logger
            .debug("evaluating walker script", Some(CATEGORY_EXTRACT), None);
        match extract_page_semantics(evaluator).await {
            Ok(summary) => {
                self.logger.info(
                    "page summary built",
                    Some(CATEGORY_EXTRACT),
                    Some(json!({
                        "url": summary.url,
                        "page_signature": summary.page_signature,
                        "headers": summary.headers.len(),
                        "forms": summary.forms.len(),
                        "interactive_elements": summary.interactive_elements.len(),
                    })),
                );
                Ok(summary)
            }
            Err(err) => {
                self.logger
                    .error(err.message(), Some(CATEGORY_EXTRACT), Some(err.to_value()));
                Err(err)
            }
        }
    }

    /// Launch a browser, open `url`, extract, and project per `options`.
    ///
    /// Every failure along the way surfaces as `URL_EXTRACTION_FAILED`.
    pub async fn extract_from_url(
        &self,
        url: &str,
        options: &OutputOptions,
    ) -> Result<UrlExtraction, ExtractionError> {
        let result = self.run_url(url, options).await;
        if let Err(err) = &result {
            self.logger
                .error(err.message(), Some(CATEGORY_NAVIGATE), Some(err.to_value()));
        }
        result
    }

    async fn run_url(
        &self,
        url: &str,
        options: &OutputOptions,
    ) -> Result<UrlExtraction, ExtractionError> {
        self.logger.info(
            format!("opening {url}"),
            Some(CATEGORY_NAVIGATE),
            Some(json!({"wait_until": self.config.wait_until.as_str()})),
        );
        let session = BrowserSession::launch(&self.config)
            .await
            .map_err(ExtractionError::url)?;

        let extracted = self.extract_in_session(&session, url, options).await;
        let closed = session.shutdown().await;

        let extraction = extracted?;
        closed.map_err(ExtractionError::url)?;
        Ok(extraction)
    }

    async fn extract_in_session(
        &self,
        session: &BrowserSession,
        url: &str,
        options: &OutputOptions,
    ) -> Result<UrlExtraction, ExtractionError> {
        session
            .goto(url, self.config.wait_until, self.config.navigation_timeout())
            .await
            .map_err(ExtractionError::url)?;
        self.logger
            .debug(format!("navigated to {url}"), Some(CATEGORY_NAVIGATE), None);

        let summary = self
            .extract(session.page())
            .await
            .map_err(|err| ExtractionError::url(err.message()))?;

        if options.requests_projection() {
            Ok(UrlExtraction::Payload(build_output_payload(&summary, options)))
        } else {
            Ok(UrlExtraction::Summary(summary))
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

/// One-shot URL extraction with default settings and the given wait condition.
pub async fn extract_from_url(
    url: &str,
    wait_until: WaitUntil,
    options: &OutputOptions,
) -> Result<UrlExtraction, ExtractionError> {
    let config = ExtractorConfig::default()
        .with_overrides(ExtractorConfigOverrides::default().wait_until(wait_until));
    Extractor::new(config).extract_from_url(url, options).await
}
