//! Structured logging with an optional external sink.
//!
//! Records go to a caller-supplied callback when one is configured, otherwise
//! they are forwarded to the `log` facade so the host's logger (the binary
//! installs `env_logger`) decides where they end up.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Verbosity;

/// Convenience alias for external logging callbacks.
pub type LogCallback = Arc<dyn Fn(&ExtractionLogRecord) + Send + Sync + 'static>;

/// Category used for pipeline stages.
pub const CATEGORY_EXTRACT: &str = "extract";
/// Category used for browser launch and navigation.
pub const CATEGORY_NAVIGATE: &str = "navigate";

#[derive(Clone, Default)]
pub struct LogConfig {
    pub verbose: Verbosity,
    pub external_logger: Option<LogCallback>,
}

impl LogConfig {
    pub fn new(verbose: Verbosity) -> Self {
        Self {
            verbose,
            ..Default::default()
        }
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level == LogLevel::Error || level.as_u8() <= self.verbose.as_u8()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Info = 1,
    Debug = 2,
}

impl LogLevel {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    fn as_log_level(self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

/// Structured log entry shared with external callbacks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionLogRecord {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub level: LogLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<Value>,
}

impl ExtractionLogRecord {
    pub fn new(
        message: impl Into<String>,
        level: LogLevel,
        category: Option<String>,
        auxiliary: Option<Value>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
            level,
            category,
            auxiliary,
        }
    }
}

/// Forward a record to the `log` facade, using the category as target.
pub fn forward_to_log(record: &ExtractionLogRecord) {
    let target = match record.category.as_deref() {
        Some(category) => format!("page_semantics::{category}"),
        None => "page_semantics".to_string(),
    };
    match record.auxiliary.as_ref().filter(|aux| !aux.is_null()) {
        Some(aux) => log::log!(
            target: target.as_str(),
            record.level.as_log_level(),
            "{} {}",
            record.message,
            aux
        ),
        None => log::log!(target: target.as_str(), record.level.as_log_level(), "{}", record.message),
    }
}

pub struct ExtractionLogger {
    config: LogConfig,
}

impl fmt::Debug for ExtractionLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionLogger")
            .field("verbosity", &self.config.verbose)
            .field("external_logger", &self.config.external_logger.is_some())
            .finish()
    }
}

impl Default for ExtractionLogger {
    fn default() -> Self {
        Self::with_config(LogConfig::default())
    }
}

impl ExtractionLogger {
    pub fn with_config(config: LogConfig) -> Self {
        Self { config }
    }

    pub fn new(verbose: Verbosity) -> Self {
        Self::with_config(LogConfig::new(verbose))
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn set_external_logger(&mut self, logger: Option<LogCallback>) {
        self.config.external_logger = logger;
    }

    pub fn log(
        &self,
        message: impl Into<String>,
        level: LogLevel,
        category: Option<&str>,
        auxiliary: Option<Value>,
    ) {
        if !self.config.should_log(level) {
            return;
        }

        let record =
            ExtractionLogRecord::new(message, level, category.map(str::to_string), auxiliary);

        match &self.config.external_logger {
            Some(callback) => callback(&record),
            None => forward_to_log(&record),
        }
    }

    pub fn error(&self, message: impl Into<String>, category: Option<&str>, auxiliary: Option<Value>) {
        self.log(message, LogLevel::Error, category, auxiliary);
    }

    pub fn info(&self, message: impl Into<String>, category: Option<&str>, auxiliary: Option<Value>) {
        self.log(message, LogLevel::Info, category, auxiliary);
    }

    pub fn debug(&self, message: impl Into<String>, category: Option<&str>, auxiliary: Option<Value>) {
        self.log(message, LogLevel::Debug, category, auxiliary);
    }
}
