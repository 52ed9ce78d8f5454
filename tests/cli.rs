use std::fs;
use std::process::Command;

use anyhow::{Context, Result};
use page_semantics::output::decode_compact_payload;
use serde_json::Value;
use tempfile::TempDir;

const SUMMARY_FIXTURE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/storefront_summary.json"
));

const THRESHOLD_VARS: [&str; 2] = ["PAGE_SEMANTICS_MIN_SCORE", "PAGE_SEMANTICS_MAX_RESULTS"];

fn project(args: &[&str]) -> Result<Value> {
    project_with_env(args, &[])
}

fn project_with_env(args: &[&str], vars: &[(&str, &str)]) -> Result<Value> {
    let temp = TempDir::new()?;
    let path = temp.path().join("summary.json");
    fs::write(&path, SUMMARY_FIXTURE)?;

    let mut command = Command::new(env!("CARGO_BIN_EXE_page-semantics"));
    command.current_dir(temp.path());
    for key in THRESHOLD_VARS {
        command.env_remove(key);
    }
    let output = command
        .arg("project")
        .arg(&path)
        .args(args)
        .envs(vars.iter().copied())
        .env("RUST_LOG", "error")
        .output()
        .context("failed to run page-semantics")?;
    assert!(
        output.status.success(),
        "page-semantics failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout)?;
    Ok(serde_json::from_str(&stdout)?)
}

#[test]
fn project_prints_deduped_actionables() -> Result<()> {
    let payload = project(&["--actionable-only", "--minify"])?;
    let items = payload.as_array().context("expected an array")?;
    assert_eq!(items.len(), 24);
    Ok(())
}

#[test]
fn project_ranks_by_intent() -> Result<()> {
    let payload = project(&["--intent", "add to cart", "--max-results", "5"])?;
    let items = payload.as_array().context("expected an array")?;
    assert_eq!(items.len(), 5);
    for item in items {
        assert!(item.get("action_signature").is_some());
    }
    Ok(())
}

#[test]
fn project_falls_back_to_configured_thresholds() -> Result<()> {
    let vars = [("PAGE_SEMANTICS_MAX_RESULTS", "3")];
    let payload = project_with_env(&["--intent", "add to cart"], &vars)?;
    assert_eq!(payload.as_array().context("expected an array")?.len(), 3);

    let vars = [("PAGE_SEMANTICS_MIN_SCORE", "1.0")];
    let strict = project_with_env(&["--intent", "cart"], &vars)?;
    let loose = project(&["--intent", "cart"])?;
    assert!(strict.as_array().context("expected an array")?.is_empty());
    assert_eq!(loose.as_array().context("expected an array")?.len(), 16);
    Ok(())
}

#[test]
fn project_flags_override_configured_thresholds() -> Result<()> {
    let vars = [
        ("PAGE_SEMANTICS_MAX_RESULTS", "3"),
        ("PAGE_SEMANTICS_MIN_SCORE", "1.0"),
    ];
    let payload = project_with_env(
        &["--intent", "add to cart", "--max-results", "5", "--min-score", "0.45"],
        &vars,
    )?;
    assert_eq!(payload.as_array().context("expected an array")?.len(), 5);
    Ok(())
}

#[test]
fn project_emits_compact_tables() -> Result<()> {
    let payload = project(&["--actionable-only", "--output-format", "compact"])?;
    assert_eq!(payload["v"], Value::from(1));
    let rows = decode_compact_payload(&payload).context("compact payload decodes")?;
    assert_eq!(rows.len(), 24);
    Ok(())
}

#[test]
fn project_rejects_non_summary_input() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("broken.json");
    fs::write(&path, r#"{"url": "https://example.com"}"#)?;

    let output = Command::new(env!("CARGO_BIN_EXE_page-semantics"))
        .arg("project")
        .arg(&path)
        .output()
        .context("failed to run page-semantics")?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not a page summary"));
    Ok(())
}
