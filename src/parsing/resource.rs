//! Resource Series Parsing
//!
//! Reads the per-metric text files Remora leaves in its output directory.
//! Each useful line starts with a timestamp followed by whitespace
//! separated columns, for example:
//!
//! ```text
//! # time cpu_user cpu_sys
//! 2024-01-01 12:00:05 42.0 3.1
//! 1704110405 41.7 2.9
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::decode::read_lines_lossy;
use super::timestamp::{parse_line_timestamp, Timestamp};
use crate::config::CorrelationConfig;
use crate::error::Result;

static DATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("valid date token regex"));

static TIME_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}").expect("valid time token regex"));

/// A single timestamped line from a resource file.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// When the sample was taken
    pub timestamp: Timestamp,
    /// Numeric columns following the timestamp
    pub values: Vec<f64>,
    /// Trimmed source line
    pub raw_line: String,
}

/// Samples per resource file, keyed by lowercased file name.
///
/// Keys iterate in first-insertion order. Inserting an existing key
/// replaces its samples without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesTable {
    entries: Vec<(String, Vec<Sample>)>,
}

impl SeriesTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the samples for a key.
    pub fn insert(&mut self, key: impl Into<String>, samples: Vec<Sample>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = samples,
            None => self.entries.push((key, samples)),
        }
    }

    /// Returns the samples for a key.
    pub fn get(&self, key: &str) -> Option<&[Sample]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, samples)| samples.as_slice())
    }

    /// Returns keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates over `(key, samples)` in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Sample])> {
        self.entries
            .iter()
            .map(|(k, samples)| (k.as_str(), samples.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses every metric file under a directory.
///
/// A missing directory yields an empty table. Files without any
/// timestamped line are left out.
pub fn parse_resource_series(dir: &Path, config: &CorrelationConfig) -> Result<SeriesTable> {
    let mut table = SeriesTable::new();

    if !dir.is_dir() {
        info!("Resource directory not found: {}", dir.display());
        return Ok(table);
    }

    let mut candidates = Vec::new();
    collect_candidate_files(dir, config, &mut candidates);
    debug!("Found {} candidate metric files", candidates.len());

    for path in candidates {
        let Some(key) = series_key(&path) else {
            continue;
        };

        let samples = parse_series_file(&path)?;
        if samples.is_empty() {
            debug!("No samples in {}", path.display());
            continue;
        }

        debug!("Parsed {} samples from {}", samples.len(), path.display());
        table.insert(key, samples);
    }

    info!("Parsed {} resource series from {}", table.len(), dir.display());
    Ok(table)
}

/// Parses all samples from one resource file, in line order.
pub fn parse_series_file(path: &Path) -> Result<Vec<Sample>> {
    let lines = read_lines_lossy(path)?;
    Ok(lines.iter().filter_map(|line| parse_sample_line(line)).collect())
}

/// Parses one resource line into a sample.
///
/// Blank lines, `#` comments and lines without a leading timestamp give
/// `None`. Non-numeric columns are skipped.
pub fn parse_sample_line(line: &str) -> Option<Sample> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let timestamp = parse_line_timestamp(line)?;

    let all_tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let mut tokens = all_tokens.as_slice();
    if let Some((first, rest)) = tokens.split_first() {
        if is_timestamp_token(first) {
            tokens = rest;
            if let Some((second, rest)) = tokens.split_first() {
                if TIME_TOKEN.is_match(second) {
                    tokens = rest;
                }
            }
        }
    }

    let values = tokens
        .iter()
        .filter_map(|token| token.parse::<f64>().ok())
        .collect();

    Some(Sample {
        timestamp,
        values,
        raw_line: trimmed.to_string(),
    })
}

fn is_timestamp_token(token: &str) -> bool {
    let all_digits = !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit());
    all_digits || DATE_TOKEN.is_match(token)
}

/// Lowercased file name used as the table key.
fn series_key(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
}

/// Walks `dir` top-down, collecting metric files.
///
/// Within a directory, files come before subdirectories and both are
/// visited in name order. Unreadable directories and symlinks to
/// directories are skipped.
fn collect_candidate_files(dir: &Path, config: &CorrelationConfig, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Skipping unreadable directory {}: {}", dir.display(), e);
            return;
        }
    };

    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        // Symlinked directories are not descended into; symlinked files count
        let is_real_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_real_dir {
            subdirs.push(path);
        } else if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    subdirs.sort();

    for file in files {
        let matches = file
            .file_name()
            .map(|name| config.is_metric_file(&name.to_string_lossy()))
            .unwrap_or(false);
        if matches {
            out.push(file);
        }
    }

    for subdir in subdirs {
        collect_candidate_files(&subdir, config, out);
    }
}
