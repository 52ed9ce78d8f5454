//! Chromiumoxide-backed [`ScriptEvaluator`] implementation.
//!
//! The walker is evaluated as a plain expression with `returnByValue`, so the
//! page hands back the record as JSON rather than a remote object handle.

use async_trait::async_trait;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use serde_json::Value;

use crate::extractor::{EvaluateError, ScriptEvaluator};

fn map_cdp_error(err: CdpError) -> EvaluateError {
    match err {
        CdpError::JavascriptException(details) => EvaluateError::Exception(format!("{details:?}")),
        other => EvaluateError::Transport(other.to_string()),
    }
}

/// Build the CDP parameters used to run a script in the page.
pub fn evaluate_params(script: &str) -> Result<EvaluateParams, EvaluateError> {
    EvaluateParams::builder()
        .expression(script)
        .return_by_value(true)
        .await_promise(true)
        .build()
        .map_err(EvaluateError::Transport)
}

#[async_trait]
impl ScriptEvaluator for Page {
    async fn evaluate(&self, script: &str) -> Result<Value, EvaluateError> {
        let params = evaluate_params(script)?;
        let result = self
            .evaluate_expression(params)
            .await
            .map_err(map_cdp_error)?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }
}
