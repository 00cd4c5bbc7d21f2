//! Timestamp helpers

use chrono::{DateTime, Local, TimeDelta};
use std::fmt::Write;
use thiserror::Error;

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error, PartialEq)]
pub enum TimeError {
    #[error("timestamp {0} is out of range")]
    OutOfRange(f64),
    #[error("invalid strftime pattern '{0}'")]
    InvalidFormat(String),
}

fn to_local(timestamp: f64) -> Result<DateTime<Local>, TimeError> {
    if !timestamp.is_finite() {
        return Err(TimeError::OutOfRange(timestamp));
    }
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
        .map(|utc| utc.with_timezone(&Local))
        .ok_or(TimeError::OutOfRange(timestamp))
}

/// Format a Unix timestamp (seconds) in local time with a strftime pattern.
pub fn format_timestamp(timestamp: f64, pattern: &str) -> Result<String, TimeError> {
    let local = to_local(timestamp)?;
    let mut out = String::new();
    // chrono reports unknown specifiers as a fmt::Error while writing.
    write!(out, "{}", local.format(pattern))
        .map_err(|_| TimeError::InvalidFormat(pattern.to_string()))?;
    Ok(out)
}

/// Whether `old_ts` lies no more than `days` days before `new_ts`.
///
/// An `old_ts` later than `new_ts` counts as within range.
pub fn is_within_days(days: i64, new_ts: f64, old_ts: f64) -> bool {
    let delta_ms = ((new_ts - old_ts) * 1000.0).round() as i64;
    let limit = TimeDelta::try_days(days).unwrap_or(TimeDelta::MAX);
    match TimeDelta::try_milliseconds(delta_ms) {
        Some(delta) => delta <= limit,
        None => delta_ms < 0,
    }
}
