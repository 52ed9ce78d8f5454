//! Run with:
//! `PAGE_SEMANTICS_CHROME_BIN=/path/to/chrome cargo run --example intent_search -- https://example.com "more information"`
//!
//! Opens the page in a visible Chromium window, summarizes it, then prints the
//! page signature and the best matches for the intent query.

use std::env;

use anyhow::{Context, Result, anyhow};
use page_semantics::config::{ExtractorConfig, ExtractorConfigOverrides, Verbosity};
use page_semantics::extractor::Extractor;
use page_semantics::intent::rank_actionable_elements;
use page_semantics::output::OutputOptions;
use page_semantics::{DEFAULT_MIN_SCORE, extract_actionable_elements};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().format_timestamp_secs().try_init();

    let mut args = env::args().skip(1);
    let url = args
        .next()
        .ok_or_else(|| anyhow!("usage: intent_search <url> <intent>"))?;
    let intent = args.next().unwrap_or_else(|| "sign in".to_string());

    let overrides = ExtractorConfigOverrides {
        verbose: Some(Verbosity::Detailed),
        ..ExtractorConfigOverrides::default()
    }
    .headless(false);
    let config = ExtractorConfig::from_env()
        .context("failed to load configuration")?
        .with_overrides(overrides);

    let extraction = Extractor::new(config)
        .extract_from_url(&url, &OutputOptions::default())
        .await
        .with_context(|| format!("failed to extract {url}"))?;
    let summary = extraction
        .summary()
        .ok_or_else(|| anyhow!("expected a full page summary"))?;

    println!("{} ({})", summary.title, summary.page_signature);
    println!(
        "{} headers, {} forms, {} interactive elements",
        summary.headers.len(),
        summary.forms.len(),
        summary.interactive_elements.len()
    );

    let actionable = extract_actionable_elements(summary);
    for ranked in rank_actionable_elements(&actionable, &intent)
        .into_iter()
        .filter(|ranked| ranked.score >= DEFAULT_MIN_SCORE)
        .take(5)
    {
        println!(
            "{:.3}  {:<10} {}",
            ranked.score,
            ranked.element.role,
            ranked
                .element
                .visible_text
                .as_deref()
                .or(ranked.element.aria_label.as_deref())
                .unwrap_or("-")
        );
    }
    Ok(())
}
