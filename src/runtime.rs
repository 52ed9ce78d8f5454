//! Chromiumoxide-based browser session.
//!
//! Launches a local Chrome, opens one page, and navigates it with a
//! [`WaitUntil`] readiness condition. This is the only part of the crate that
//! owns a browser process; everything downstream only sees a
//! [`ScriptEvaluator`](crate::extractor::ScriptEvaluator).

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use log::{debug, warn};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, timeout};

use crate::config::{ExtractorConfig, WaitUntil};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(50);
const NETWORK_IDLE_QUIET: Duration = Duration::from_millis(500);

/// Errors raised while driving the browser.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to build browser config: {0}")]
    Config(String),
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("failed to navigate to {url}: {message}")]
    Navigation { url: String, message: String },
    #[error("timed out after {timeout_ms}ms waiting for {wait_until} on {url}")]
    Timeout {
        url: String,
        wait_until: WaitUntil,
        timeout_ms: u64,
    },
    #[error("browser page error: {0}")]
    Page(String),
}

fn map_page_error<E: std::fmt::Display>(err: E) -> RuntimeError {
    RuntimeError::Page(err.to_string())
}

/// One launched browser with a single working page.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
}

impl BrowserSession {
    /// Launch Chrome according to `config` and open a blank page.
    pub async fn launch(config: &ExtractorConfig) -> Result<Self, RuntimeError> {
        let browser_config = build_config(config)?;
        let (browser, handler) = Browser::launch(browser_config)
            .await
            .map_err(|err| RuntimeError::Launch(err.to_string()))?;
        let handler = spawn_handler(handler);

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(err) => {
                handler.abort();
                return Err(RuntimeError::Launch(err.to_string()));
            }
        };

        debug!("browser launched (headless: {})", config.headless);
        Ok(Self {
            browser,
            handler,
            page,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate and wait for `wait_until`, bounded by `limit`.
    pub async fn goto(
        &self,
        url: &str,
        wait_until: WaitUntil,
        limit: Duration,
    ) -> Result<(), RuntimeError> {
        let navigate = async {
            self.page
                .goto(url)
                .await
                .map_err(|err| RuntimeError::Navigation {
                    url: url.to_string(),
                    message: err.to_string(),
                })?;
            wait_for(&self.page, wait_until).await
        };

        timeout(limit, navigate)
            .await
            .map_err(|_| RuntimeError::Timeout {
                url: url.to_string(),
                wait_until,
                timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            })?
    }

    /// Replace the page document with `html`.
    pub async fn set_content(&self, html: &str) -> Result<(), RuntimeError> {
        self.page.set_content(html).await.map_err(map_page_error)?;
        Ok(())
    }

    /// Close the browser and stop the CDP handler task.
    pub async fn shutdown(mut self) -> Result<(), RuntimeError> {
        let closed = self.browser.close().await.map_err(map_page_error);
        if closed.is_ok() {
            if let Err(err) = self.browser.wait().await {
                warn!("browser process did not exit cleanly: {err}");
            }
        }
        self.handler.abort();
        closed.map(|_| ())
    }
}

async fn ready_state(page: &Page) -> Result<String, RuntimeError> {
    let state = page
        .evaluate("document.readyState")
        .await
        .map_err(map_page_error)?
        .into_value::<String>()
        .map_err(map_page_error)?;
    Ok(state)
}

async fn resource_count(page: &Page) -> Result<u64, RuntimeError> {
    page.evaluate("performance.getEntriesByType('resource').length")
        .await
        .map_err(map_page_error)?
        .into_value::<u64>()
        .map_err(map_page_error)
}

async fn wait_for(page: &Page, wait_until: WaitUntil) -> Result<(), RuntimeError> {
    let accepted: &[&str] = match wait_until {
        WaitUntil::Commit => return Ok(()),
        WaitUntil::DomContentLoaded => &["interactive", "complete"],
        WaitUntil::Load | WaitUntil::NetworkIdle => &["complete"],
    };
    loop {
        let state = ready_state(page).await?;
        if accepted.contains(&state.as_str()) {
            break;
        }
        sleep(READY_POLL_INTERVAL).await;
    }
    if wait_until != WaitUntil::NetworkIdle {
        return Ok(());
    }

    let mut last = resource_count(page).await?;
    let mut quiet_since = Instant::now();
    while quiet_since.elapsed() < NETWORK_IDLE_QUIET {
        sleep(READY_POLL_INTERVAL).await;
        let current = resource_count(page).await?;
        if current != last {
            last = current;
            quiet_since = Instant::now();
        }
    }
    Ok(())
}

fn build_config(config: &ExtractorConfig) -> Result<BrowserConfig, RuntimeError> {
    let mut builder = BrowserConfig::builder();
    if let Some(path) = &config.chrome_executable {
        builder = builder.chrome_executable(path);
    }
    let builder = if config.headless {
        builder
    } else {
        builder.with_head()
    };
    builder.build().map_err(RuntimeError::Config)
}

fn spawn_handler(mut handler: chromiumoxide::handler::Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(result) = handler.next().await {
            if let Err(err) = result {
                debug!("chromiumoxide handler error: {err}");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn explicit_executable_builds_config() {
        let config = ExtractorConfig {
            chrome_executable: Some(PathBuf::from("/opt/chrome/chrome")),
            headless: false,
            ..ExtractorConfig::default()
        };
        assert!(build_config(&config).is_ok());
    }

    #[test]
    fn timeout_error_names_the_condition() {
        let err = RuntimeError::Timeout {
            url: "https://example.com".into(),
            wait_until: WaitUntil::NetworkIdle,
            timeout_ms: 1_000,
        };
        let text = err.to_string();
        assert!(text.contains("networkidle"));
        assert!(text.contains("https://example.com"));
    }
}
