//! Progress value persistence
//!
//! Hosts that launch the tool poll a small JSON file, `{"ProgressValue": N}`,
//! to display how far a run has got.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the progress file location.
pub const STATE_FILE_ENV_VAR: &str = "VENN_STATE_FILE";
pub const DEFAULT_STATE_FILE: &str = "./state.json";

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("ProgressValue must be between 0 and 100, but got [{0}].")]
    OutOfRange(i64),
    #[error("failed writing progress file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed progress file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct ProgressState {
    #[serde(rename = "ProgressValue")]
    progress_value: u8,
}

/// A progress file; every `set` replaces its content.
#[derive(Debug, Clone)]
pub struct ProgressFile {
    path: PathBuf,
}

impl Default for ProgressFile {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_FILE)
    }
}

impl ProgressFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `VENN_STATE_FILE` when set and non-empty, else `./state.json`.
    pub fn from_env() -> Self {
        match std::env::var_os(STATE_FILE_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set(&self, value: i64) -> Result<(), ProgressError> {
        let progress_value = u8::try_from(value)
            .ok()
            .filter(|v| *v <= 100)
            .ok_or(ProgressError::OutOfRange(value))?;

        let body = serde_json::to_string(&ProgressState { progress_value })?;
        let write_err = |source| ProgressError::Write { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            super::paths::ensure_dir(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, body).map_err(write_err)?;
        tracing::trace!(value = progress_value, path = %self.path.display(), "progress updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn stored_value(progress: &ProgressFile) -> u8 {
        let content = fs::read_to_string(progress.path()).expect("read");
        serde_json::from_str::<ProgressState>(&content).expect("json").progress_value
    }

    #[test]
    fn set_writes_progress_json() {
        let tmp = TempDir::new().expect("tmp");
        let progress = ProgressFile::new(tmp.path().join("state.json"));
        progress.set(45).expect("set");

        let content = fs::read_to_string(progress.path()).expect("read");
        assert_eq!(content, r#"{"ProgressValue":45}"#);
        assert_eq!(stored_value(&progress), 45);
    }

    #[test]
    fn set_replaces_previous_value() {
        let tmp = TempDir::new().expect("tmp");
        let progress = ProgressFile::new(tmp.path().join("nested").join("state.json"));
        progress.set(5).expect("set");
        progress.set(100).expect("set");
        assert_eq!(stored_value(&progress), 100);
    }

    #[test]
    fn set_rejects_out_of_range_values() {
        let tmp = TempDir::new().expect("tmp");
        let progress = ProgressFile::new(tmp.path().join("state.json"));

        let err = progress.set(101).expect_err("too large");
        assert_eq!(err.to_string(), "ProgressValue must be between 0 and 100, but got [101].");
        assert!(matches!(progress.set(-1), Err(ProgressError::OutOfRange(-1))));
        assert!(!progress.path().exists());
    }
}
