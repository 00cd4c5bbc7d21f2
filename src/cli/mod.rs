//! Command-line entry point.
//!
//! The option set is not hard-coded: it is built at start-up from the argument
//! schema (see [`crate::schema`]), then the parsed values drive the Venn run.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod dynamic;

pub use dynamic::{build_command, parse_args_from};

use crate::schema::{load_schema_from, resolve_schema_source, SCHEMA_ENV_VAR};
use crate::utils::{
    format_timestamp, init_logging, LogConfig, ProgressFile, DEFAULT_TIMESTAMP_FORMAT,
};
use crate::venn::{run_venn, VennOptions};

/// Progress milestones written to the progress file.
const PROGRESS_STARTED: i64 = 5;
const PROGRESS_ARGS_PARSED: i64 = 45;
const PROGRESS_RUNNING: i64 = 80;
const PROGRESS_DONE: i64 = 100;

pub fn run() -> Result<()> {
    let progress = ProgressFile::from_env();
    progress.set(PROGRESS_STARTED)?;

    if let Some(log_path) = init_logging(&LogConfig::from_env())? {
        tracing::debug!("Logging to {}", log_path.display());
    }
    let started =
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs_f64()).unwrap_or(0.0);
    if let Ok(stamp) = format_timestamp(started, DEFAULT_TIMESTAMP_FORMAT) {
        tracing::debug!("Run started at {}", stamp);
    }

    let explicit = std::env::var_os(SCHEMA_ENV_VAR).filter(|v| !v.is_empty()).map(PathBuf::from);
    let cwd = std::env::current_dir().context("Failed resolving current directory")?;
    let source = resolve_schema_source(explicit.as_deref(), &cwd)?;
    let schema = load_schema_from(&source)
        .with_context(|| format!("Failed loading argument schema from {source}"))?;
    tracing::debug!(schema = %source, arguments = schema.arguments.len(), "argument schema loaded");

    // Help, version and usage errors print through clap and exit here.
    let arguments = parse_args_from(&schema, std::env::args_os()).unwrap_or_else(|e| e.exit());
    progress.set(PROGRESS_ARGS_PARSED)?;

    tracing::debug!("Input Arguments: {}", arguments);
    progress.set(PROGRESS_RUNNING)?;

    let options = VennOptions::from_args(&arguments)?;
    let report = run_venn(&options, |path| {
        println!("Intersection data saved to: {}", path.display());
    })?;

    println!("Venn diagram saved to: {}", report.image_summary());

    progress.set(PROGRESS_DONE)?;
    Ok(())
}
