//! Line Timestamp Parsing
//!
//! Recognizes the two leading timestamp encodings found in task logs and
//! resource files:
//!
//! - `YYYY-MM-DD HH:MM:SS` in the first 19 characters
//! - Unix epoch seconds as a leading run of 9 or more digits

use chrono::{Datelike, Local, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

/// Wall-clock timestamp without zone; epoch values are converted to local time.
pub type Timestamp = NaiveDateTime;

/// Format shared by log headers, resource lines and CSV output.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Years a converted epoch value may fall in.
const EPOCH_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Character length of a `TIME_FORMAT` timestamp.
const DATETIME_LEN: usize = 19;

static EPOCH_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<sec>[0-9]{9,})(\.[0-9]+)?").expect("valid epoch regex"));

/// Parses a leading timestamp from a line.
///
/// Returns `None` for empty lines and anything that matches neither
/// encoding. The fractional part of an epoch value is ignored.
///
/// # Example
///
/// ```
/// use remora_correlate::parsing::timestamp::{format_timestamp, parse_line_timestamp};
///
/// let ts = parse_line_timestamp("2024-01-01 12:00:00 5 10.5").unwrap();
/// assert_eq!(format_timestamp(&ts), "2024-01-01 12:00:00");
/// assert!(parse_line_timestamp("garbage").is_none());
/// ```
pub fn parse_line_timestamp(line: &str) -> Option<Timestamp> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(ts) = parse_datetime_prefix(line) {
        return Some(ts);
    }

    let caps = EPOCH_PREFIX.captures(line)?;
    let seconds: i64 = caps["sec"].parse().ok()?;
    epoch_to_local(seconds)
}

/// Parses a `YYYY-MM-DD HH:MM:SS` date-time occupying exactly the input.
pub fn parse_datetime(text: &str) -> Option<Timestamp> {
    NaiveDateTime::parse_from_str(text, TIME_FORMAT).ok()
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIME_FORMAT).to_string()
}

fn parse_datetime_prefix(line: &str) -> Option<Timestamp> {
    let mut chars = line.char_indices();
    let shape_ok = chars.clone().nth(4).map(|(_, c)| c) == Some('-')
        && chars.clone().nth(7).map(|(_, c)| c) == Some('-');
    if !shape_ok {
        return None;
    }

    // Byte offset just past the 19th character
    let end = match chars.nth(DATETIME_LEN) {
        Some((offset, _)) => offset,
        None if line.chars().count() == DATETIME_LEN => line.len(),
        None => return None,
    };

    parse_datetime(&line[..end])
}

fn epoch_to_local(seconds: i64) -> Option<Timestamp> {
    Local
        .timestamp_opt(seconds, 0)
        .single()
        .map(|dt| dt.naive_local())
        .filter(|dt| EPOCH_YEAR_RANGE.contains(&dt.year()))
}
