//! Tracing subscriber setup: stderr plus an optional plain-text log file.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::paths::ensure_dir;

/// Environment variable overriding the log directory; empty disables the file log.
pub const LOG_DIR_ENV_VAR: &str = "VENN_LOG_DIR";
pub const DEFAULT_LOG_DIR: &str = "./logs";
pub const LOG_FILE_NAME: &str = "venn-intersect.log";

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: Level::INFO, log_dir: Some(PathBuf::from(DEFAULT_LOG_DIR)) }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        let log_dir = match std::env::var_os(LOG_DIR_ENV_VAR) {
            Some(dir) if dir.is_empty() => None,
            Some(dir) => Some(PathBuf::from(dir)),
            None => Some(PathBuf::from(DEFAULT_LOG_DIR)),
        };
        Self { log_dir, ..Self::default() }
    }
}

/// Install the global subscriber. Returns the log file path when one is used.
///
/// RUST_LOG in the environment takes precedence over `config.level`, which
/// only applies when RUST_LOG is unset or empty. A subscriber installed
/// earlier (tests, embedding) is left in place.
pub fn init_logging(config: &LogConfig) -> Result<Option<PathBuf>> {
    let filter = build_filter(config.level);

    let (file_layer, log_path) = match &config.log_dir {
        Some(dir) => {
            ensure_dir(dir)
                .with_context(|| format!("Failed creating log directory: {}", dir.display()))?;
            let path = dir.join(LOG_FILE_NAME);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed opening log file: {}", path.display()))?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    let stderr_layer =
        fmt::layer().with_ansi(std::io::stderr().is_terminal()).with_writer(std::io::stderr);
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(filter)
        .try_init();

    Ok(log_path)
}

fn build_filter(default_level: Level) -> EnvFilter {
    EnvFilter::builder().with_default_directive(default_level.into()).from_env_lossy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_logging_creates_log_file() {
        let tmp = TempDir::new().expect("tmp");
        let config = LogConfig { level: Level::DEBUG, log_dir: Some(tmp.path().join("logs")) };
        let path = init_logging(&config).expect("init").expect("file path");
        assert!(path.exists());
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(LOG_FILE_NAME));

        // A second call must not fail even though a subscriber is installed.
        init_logging(&LogConfig { level: Level::INFO, log_dir: None }).expect("re-init");
    }
}
