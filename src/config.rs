//! Strongly-typed configuration for the extractor and its browser session.
//!
//! Values can be constructed from defaults, loaded from environment variables
//! (with optional `.env` support), or merged with explicit overrides for
//! programmatic updates.

use std::env;
use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;
use serde::de::{Deserialize, Deserializer, Error as DeError};
use serde::ser::{Serialize, Serializer};
use serde::{Deserialize as DeriveDeserialize, Serialize as DeriveSerialize};
use thiserror::Error;

use crate::intent::DEFAULT_MIN_SCORE;
use crate::output::OutputOptions;

/// Default navigation timeout in milliseconds.
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Verbosity level for extractor logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Minimal,
    #[default]
    Medium,
    Detailed,
}

impl Verbosity {
    pub fn as_u8(self) -> u8 {
        match self {
            Verbosity::Minimal => 0,
            Verbosity::Medium => 1,
            Verbosity::Detailed => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Verbosity::Minimal),
            1 => Some(Verbosity::Medium),
            2 => Some(Verbosity::Detailed),
            _ => None,
        }
    }
}

impl Serialize for Verbosity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for Verbosity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Verbosity::from_u8(value).ok_or_else(|| {
            DeError::custom(format!(
                "invalid verbosity value {value}; expected 0, 1, or 2"
            ))
        })
    }
}

/// Page lifecycle point navigation waits for before the walker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, DeriveSerialize, DeriveDeserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    /// Navigation committed; no readiness wait.
    Commit,
    /// `document.readyState` is at least `interactive`.
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    /// `document.readyState` is `complete`.
    #[default]
    Load,
    /// Load, then no new resource entries for a quiet period.
    #[serde(rename = "networkidle")]
    NetworkIdle,
}

impl WaitUntil {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "commit" => Some(WaitUntil::Commit),
            "domcontentloaded" => Some(WaitUntil::DomContentLoaded),
            "load" => Some(WaitUntil::Load),
            "networkidle" => Some(WaitUntil::NetworkIdle),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WaitUntil::Commit => "commit",
            WaitUntil::DomContentLoaded => "domcontentloaded",
            WaitUntil::Load => "load",
            WaitUntil::NetworkIdle => "networkidle",
        }
    }
}

impl fmt::Display for WaitUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration values for an [`Extractor`](crate::extractor::Extractor).
#[derive(Debug, Clone, PartialEq, DeriveSerialize, DeriveDeserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    #[serde(alias = "chromeExecutable")]
    pub chrome_executable: Option<PathBuf>,
    pub headless: bool,
    #[serde(alias = "waitUntil")]
    pub wait_until: WaitUntil,
    #[serde(alias = "navigationTimeoutMs")]
    pub navigation_timeout_ms: u64,
    #[serde(alias = "minScore")]
    pub min_score: f64,
    #[serde(alias = "maxResults")]
    pub max_results: Option<usize>,
    pub verbose: Verbosity,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            headless: true,
            wait_until: WaitUntil::default(),
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            min_score: DEFAULT_MIN_SCORE,
            max_results: None,
            verbose: Verbosity::default(),
        }
    }
}

/// Field-level overrides for [`ExtractorConfig::with_overrides`].
///
/// Nullable fields take `Some(None)` to clear the current value.
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfigOverrides {
    pub chrome_executable: Option<Option<PathBuf>>,
    pub headless: Option<bool>,
    pub wait_until: Option<WaitUntil>,
    pub navigation_timeout_ms: Option<u64>,
    pub min_score: Option<f64>,
    pub max_results: Option<Option<usize>>,
    pub verbose: Option<Verbosity>,
}

impl ExtractorConfigOverrides {
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = Some(headless);
        self
    }

    pub fn wait_until(mut self, wait_until: WaitUntil) -> Self {
        self.wait_until = Some(wait_until);
        self
    }

    pub fn chrome_executable<T: Into<Option<PathBuf>>>(mut self, path: T) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }
}

impl ExtractorConfig {
    /// Construct a configuration from `PAGE_SEMANTICS_*` environment variables,
    /// after loading a `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv();
        let mut config = ExtractorConfig::default();

        if let Some(value) = env_var("PAGE_SEMANTICS_CHROME_BIN") {
            config.chrome_executable = Some(PathBuf::from(value));
        }

        if let Some(value) = env_var("PAGE_SEMANTICS_HEADLESS") {
            config.headless = parse_bool("PAGE_SEMANTICS_HEADLESS", &value)?;
        }

        if let Some(value) = env_var("PAGE_SEMANTICS_WAIT_UNTIL") {
            config.wait_until = WaitUntil::parse(&value)
                .ok_or_else(|| ConfigError::invalid_enum("PAGE_SEMANTICS_WAIT_UNTIL", value))?;
        }

        if let Some(value) = env_var("PAGE_SEMANTICS_NAVIGATION_TIMEOUT_MS") {
            config.navigation_timeout_ms =
                parse_u64("PAGE_SEMANTICS_NAVIGATION_TIMEOUT_MS", &value)?;
        }

        if let Some(value) = env_var("PAGE_SEMANTICS_MIN_SCORE") {
            config.min_score = parse_score("PAGE_SEMANTICS_MIN_SCORE", &value)?;
        }

        if let Some(value) = env_var("PAGE_SEMANTICS_MAX_RESULTS") {
            let parsed = parse_u64("PAGE_SEMANTICS_MAX_RESULTS", &value)?;
            config.max_results = Some(usize::try_from(parsed).unwrap_or(usize::MAX));
        }

        if let Some(value) = env_var("PAGE_SEMANTICS_VERBOSE") {
            let parsed = parse_u64("PAGE_SEMANTICS_VERBOSE", &value)?;
            config.verbose = u8::try_from(parsed)
                .ok()
                .and_then(Verbosity::from_u8)
                .ok_or_else(|| {
                    ConfigError::invalid_enum("PAGE_SEMANTICS_VERBOSE", parsed.to_string())
                })?;
        }

        Ok(config)
    }

    /// Create a new configuration with explicit field overrides applied.
    pub fn with_overrides(&self, overrides: ExtractorConfigOverrides) -> ExtractorConfig {
        let mut updated = self.clone();
        if let Some(value) = overrides.chrome_executable {
            updated.chrome_executable = value;
        }
        if let Some(value) = overrides.headless {
            updated.headless = value;
        }
        if let Some(value) = overrides.wait_until {
            updated.wait_until = value;
        }
        if let Some(value) = overrides.navigation_timeout_ms {
            updated.navigation_timeout_ms = value;
        }
        if let Some(value) = overrides.min_score {
            updated.min_score = value;
        }
        if let Some(value) = overrides.max_results {
            updated.max_results = value;
        }
        if let Some(value) = overrides.verbose {
            updated.verbose = value;
        }
        updated
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Projection options seeded with the configured intent thresholds.
    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            min_score: self.min_score,
            max_results: self.max_results,
            ..OutputOptions::default()
        }
    }
}

/// Errors that can arise while constructing an [`ExtractorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {field}")]
    InvalidEnumVariant { field: &'static str, value: String },
    #[error("invalid boolean '{value}' for {field}")]
    InvalidBool { field: &'static str, value: String },
    #[error("invalid number '{value}' for {field}: {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid score '{value}' for {field}: {source}")]
    InvalidScore {
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("{field} must be between 0 and 1, got {value}")]
    ScoreOutOfRange { field: &'static str, value: f64 },
}

impl ConfigError {
    fn invalid_enum(field: &'static str, value: String) -> Self {
        ConfigError::InvalidEnumVariant { field, value }
    }
}

fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            field,
            value: value.to_string(),
        }),
    }
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|source| ConfigError::InvalidNumber {
            field,
            value: value.to_string(),
            source,
        })
}

fn parse_score(field: &'static str, value: &str) -> Result<f64, ConfigError> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|source| ConfigError::InvalidScore {
            field,
            value: value.to_string(),
            source,
        })?;
    if !(0.0..=1.0).contains(&parsed) {
        return Err(ConfigError::ScoreOutOfRange {
            field,
            value: parsed,
        });
    }
    Ok(parsed)
}
