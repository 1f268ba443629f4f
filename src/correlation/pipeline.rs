//! One-shot Correlation Run
//!
//! Ties extraction, series parsing, alignment and report writing together.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::aligner::align_events;
use super::report::{write_events_csv, write_summary};
use crate::config::CorrelationConfig;
use crate::error::{CorrelateError, Result};
use crate::parsing::{extract_events, parse_resource_series};

/// File name of the joined event table.
pub const EVENTS_CSV: &str = "events.csv";

/// File name of the run summary.
pub const SUMMARY_TXT: &str = "summary.txt";

/// Input and output locations for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Task output log (may not exist)
    pub log_path: PathBuf,
    /// Remora output directory (may not exist)
    pub remora_dir: PathBuf,
    /// Output directory, created if absent
    pub out_dir: PathBuf,
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunOutputs {
    pub events_csv: PathBuf,
    pub summary_txt: PathBuf,
    pub event_count: usize,
    pub series_keys: Vec<String>,
}

/// Runs the full pipeline and writes both output files.
///
/// Missing inputs produce empty results. Only output failures and
/// unreadable existing inputs are errors.
pub fn run(options: &RunOptions, config: &CorrelationConfig) -> Result<RunOutputs> {
    ensure_out_dir(&options.out_dir)?;

    let events = extract_events(&options.log_path, config)?;
    let series = parse_resource_series(&options.remora_dir, config)?;

    let aligned = align_events(&events, &series, config);

    let events_csv = options.out_dir.join(EVENTS_CSV);
    write_events_csv(&events_csv, &aligned)?;

    let summary_txt = options.out_dir.join(SUMMARY_TXT);
    write_summary(&summary_txt, events.len(), &series)?;

    info!(
        "Correlated {} events against {} series",
        events.len(),
        series.len()
    );

    Ok(RunOutputs {
        events_csv,
        summary_txt,
        event_count: events.len(),
        series_keys: series.keys().map(str::to_string).collect(),
    })
}

fn ensure_out_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .map_err(|e| CorrelateError::io("Failed to create output directory", dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_run_creates_nested_out_dir() {
        let temp_dir = tempdir().unwrap();
        let options = RunOptions {
            log_path: temp_dir.path().join("missing.log"),
            remora_dir: temp_dir.path().join("missing_remora"),
            out_dir: temp_dir.path().join("a").join("b"),
        };

        let outputs = run(&options, &CorrelationConfig::default()).unwrap();

        assert!(outputs.events_csv.exists());
        assert!(outputs.summary_txt.exists());
        assert_eq!(outputs.event_count, 0);
        assert!(outputs.series_keys.is_empty());
    }

    #[test]
    fn test_run_fails_when_out_dir_is_a_file() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("out");
        fs::write(&blocker, "not a directory").unwrap();

        let options = RunOptions {
            log_path: temp_dir.path().join("missing.log"),
            remora_dir: temp_dir.path().join("missing_remora"),
            out_dir: blocker,
        };

        let result = run(&options, &CorrelationConfig::default());
        assert!(matches!(result, Err(CorrelateError::Io { .. })));
    }
}
