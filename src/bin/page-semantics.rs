//! Page semantics CLI.
//!
//! Usage examples:
//!   Extract a live page (needs a local Chrome):
//!     $ PAGE_SEMANTICS_CHROME_BIN=/path/to/chrome \
//!       cargo run --bin page-semantics -- extract https://example.com --actionable-only
//!   Reproject a saved summary:
//!     $ cargo run --bin page-semantics -- project tests/fixtures/storefront_summary.json \
//!       --intent "add to cart" --output-format compact

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use page_semantics::config::{ExtractorConfig, ExtractorConfigOverrides, Verbosity, WaitUntil};
use page_semantics::extractor::Extractor;
use page_semantics::output::{OutputFormat, OutputOptions, build_output_payload, render_payload};
use page_semantics::types::PageSummary;
use serde_json::Value;

#[derive(Parser)]
#[command(
    name = "page-semantics",
    author,
    version,
    about = "Deterministic semantic page summaries"
)]
struct Cli {
    /// Emit detailed extraction logs.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a URL in Chrome and print its semantic summary.
    Extract(ExtractArgs),
    /// Reproject a saved page summary JSON document.
    Project(ProjectArgs),
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum WaitArg {
    Load,
    Domcontentloaded,
    Networkidle,
    Commit,
}

impl From<WaitArg> for WaitUntil {
    fn from(value: WaitArg) -> Self {
        match value {
            WaitArg::Load => WaitUntil::Load,
            WaitArg::Domcontentloaded => WaitUntil::DomContentLoaded,
            WaitArg::Networkidle => WaitUntil::NetworkIdle,
            WaitArg::Commit => WaitUntil::Commit,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum FormatArg {
    Json,
    Compact,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Compact => OutputFormat::Compact,
        }
    }
}

#[derive(Args)]
struct ProjectionArgs {
    /// Print only deduplicated actionable elements.
    #[arg(long)]
    actionable_only: bool,

    /// Filter actionable elements by an intent query (e.g. "add to cart").
    #[arg(long)]
    intent: Option<String>,

    /// Minimum intent match score (0.0 to 1.0). Defaults to PAGE_SEMANTICS_MIN_SCORE.
    #[arg(long)]
    min_score: Option<f64>,

    /// Maximum number of filtered results. Defaults to PAGE_SEMANTICS_MAX_RESULTS.
    #[arg(long)]
    max_results: Option<usize>,

    /// `json` strips action_signature/disabled, `compact` dictionary-encodes.
    #[arg(long, value_enum)]
    output_format: Option<FormatArg>,

    /// Print minified canonical JSON.
    #[arg(long)]
    minify: bool,
}

impl ProjectionArgs {
    fn options(&self, config: &ExtractorConfig) -> OutputOptions {
        let defaults = config.output_options();
        OutputOptions {
            actionable_only: self.actionable_only,
            intent: self.intent.clone(),
            min_score: self.min_score.unwrap_or(defaults.min_score),
            max_results: self.max_results.or(defaults.max_results),
            output_format: self.output_format.map(OutputFormat::from),
        }
    }
}

#[derive(Args)]
struct ExtractArgs {
    /// Target URL to extract.
    url: String,

    /// Page lifecycle point to wait for after navigation.
    #[arg(long, value_enum)]
    wait_until: Option<WaitArg>,

    /// Show the launched browser window.
    #[arg(long)]
    show_browser: bool,

    #[command(flatten)]
    projection: ProjectionArgs,
}

#[derive(Args)]
struct ProjectArgs {
    /// Path to a saved page summary.
    summary: PathBuf,

    #[command(flatten)]
    projection: ProjectionArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_env_logger();

    let cli = Cli::parse();
    let verbosity = cli.verbose.then_some(Verbosity::Detailed);

    let (payload, minify) = match cli.command {
        Command::Extract(args) => {
            let minify = args.projection.minify;
            (run_extract(args, verbosity).await?, minify)
        }
        Command::Project(args) => {
            let minify = args.projection.minify;
            (run_project(args)?, minify)
        }
    };

    let rendered = render_payload(&payload, minify).context("failed to render payload")?;
    println!("{rendered}");
    Ok(())
}

async fn run_extract(args: ExtractArgs, verbosity: Option<Verbosity>) -> Result<Value> {
    let mut overrides = ExtractorConfigOverrides {
        verbose: verbosity,
        ..ExtractorConfigOverrides::default()
    };
    if let Some(wait) = args.wait_until {
        overrides = overrides.wait_until(wait.into());
    }
    if args.show_browser {
        overrides = overrides.headless(false);
    }

    let config = ExtractorConfig::from_env()
        .context("failed to load configuration")?
        .with_overrides(overrides);
    info!("extracting {} (wait until {})", args.url, config.wait_until);

    let extractor = Extractor::new(config);
    let extraction = extractor
        .extract_from_url(&args.url, &args.projection.options(extractor.config()))
        .await
        .with_context(|| format!("failed to extract {}", args.url))?;
    Ok(extraction.into_value())
}

fn run_project(args: ProjectArgs) -> Result<Value> {
    let config = ExtractorConfig::from_env().context("failed to load configuration")?;
    let raw = fs::read_to_string(&args.summary)
        .with_context(|| format!("failed to read {}", args.summary.display()))?;
    let summary: PageSummary = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a page summary", args.summary.display()))?;
    info!(
        "projecting {} ({} interactive elements)",
        args.summary.display(),
        summary.interactive_elements.len()
    );
    Ok(build_output_payload(&summary, &args.projection.options(&config)))
}

fn init_env_logger() {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "info");
        }
    }

    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .format_timestamp_secs()
        .try_init();
}
