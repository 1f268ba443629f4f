//! Output Reports
//!
//! Writes the joined `events.csv` and the two-line `summary.txt`.

use std::fs::{self, File};
use std::path::Path;

use csv::{Terminator, WriterBuilder};
use log::info;

use super::aligner::AlignedEvent;
use crate::error::{CorrelateError, Result};
use crate::parsing::{format_timestamp, Sample, SeriesTable};

/// Column names of `events.csv`.
pub const EVENTS_CSV_HEADER: [&str; 6] = [
    "event_time",
    "event_text",
    "cpu_sample_time",
    "cpu_sample_line",
    "mem_sample_time",
    "mem_sample_line",
];

/// Writes one CSV row per aligned event, after the header row.
///
/// A failure part way through leaves the file truncated.
pub fn write_events_csv(path: &Path, rows: &[AlignedEvent<'_>]) -> Result<()> {
    let file = File::create(path).map_err(|e| CorrelateError::io("Failed to create", path, e))?;
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(file);

    writer.write_record(EVENTS_CSV_HEADER)?;

    for row in rows {
        let (cpu_time, cpu_line) = sample_columns(row.cpu);
        let (mem_time, mem_line) = sample_columns(row.mem);
        writer.write_record([
            format_timestamp(&row.event.timestamp).as_str(),
            row.event.text.as_str(),
            cpu_time.as_str(),
            cpu_line,
            mem_time.as_str(),
            mem_line,
        ])?;
    }

    writer
        .flush()
        .map_err(|e| CorrelateError::io("Failed to write", path, e))?;

    info!("Wrote {} event rows to {}", rows.len(), path.display());
    Ok(())
}

/// Renders the run summary text.
pub fn render_summary(event_count: usize, series: &SeriesTable) -> String {
    let keys: Vec<&str> = series.keys().collect();
    format!(
        "events: {}\nremora_series: {}\n",
        event_count,
        keys.join(", ")
    )
}

/// Writes the run summary file.
pub fn write_summary(path: &Path, event_count: usize, series: &SeriesTable) -> Result<()> {
    fs::write(path, render_summary(event_count, series))
        .map_err(|e| CorrelateError::io("Failed to write", path, e))
}

fn sample_columns(sample: Option<&Sample>) -> (String, &str) {
    match sample {
        Some(s) => (format_timestamp(&s.timestamp), s.raw_line.as_str()),
        None => (String::new(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use crate::parsing::resource::parse_sample_line;
    use crate::parsing::timestamp::parse_datetime;
    use crate::parsing::Event;

    fn event(time: &str, text: &str) -> Event {
        Event {
            timestamp: parse_datetime(time).unwrap(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_write_events_csv() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("events.csv");

        let events = vec![
            event("2024-01-01 12:00:00", "Running orthophoto stage"),
            event("2024-01-01 12:05:00", "mesh, \"textured\""),
        ];
        let cpu = parse_sample_line("2024-01-01 12:00:05 42.0").unwrap();
        let rows = vec![
            AlignedEvent {
                event: &events[0],
                cpu: Some(&cpu),
                mem: None,
            },
            AlignedEvent {
                event: &events[1],
                cpu: None,
                mem: None,
            },
        ];

        write_events_csv(&path, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "event_time,event_text,cpu_sample_time,cpu_sample_line,mem_sample_time,mem_sample_line"
        );
        assert_eq!(
            lines[1],
            "2024-01-01 12:00:00,Running orthophoto stage,2024-01-01 12:00:05,2024-01-01 12:00:05 42.0,,"
        );
        assert_eq!(lines[2], "2024-01-01 12:05:00,\"mesh, \"\"textured\"\"\",,,,");
        assert!(content.ends_with("\r\n"));
    }

    #[test]
    fn test_write_events_csv_header_only() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("events.csv");

        write_events_csv(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_write_events_csv_bad_path() {
        let result = write_events_csv(Path::new("/nonexistent/dir/events.csv"), &[]);
        assert!(matches!(result, Err(CorrelateError::Io { .. })));
    }

    #[test]
    fn test_render_summary() {
        let mut table = SeriesTable::new();
        table.insert("cpu.log", vec![parse_sample_line("2024-01-01 12:00:00 1").unwrap()]);
        table.insert("mem.log", vec![parse_sample_line("2024-01-01 12:00:00 2").unwrap()]);

        assert_eq!(
            render_summary(3, &table),
            "events: 3\nremora_series: cpu.log, mem.log\n"
        );
    }

    #[test]
    fn test_render_summary_no_series() {
        assert_eq!(
            render_summary(0, &SeriesTable::new()),
            "events: 0\nremora_series: \n"
        );
    }
}
