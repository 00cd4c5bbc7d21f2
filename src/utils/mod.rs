//! Stateless helpers: text decoding, hashing, paths, timestamps, progress and logging.

pub mod encoding;
pub mod hashing;
pub mod logging;
pub mod paths;
pub mod progress;
pub mod time;

pub use encoding::{decode_bytes, looks_binary, read_text, DecodedText};
pub use hashing::sha256_file;
pub use logging::{init_logging, LogConfig};
pub use paths::{ensure_dir, with_extension_in};
pub use progress::{ProgressError, ProgressFile};
pub use time::{format_timestamp, is_within_days, DEFAULT_TIMESTAMP_FORMAT};

/// Split a comma-separated string, trimming whitespace and discarding empty
/// segments.
pub fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}
