//! Correlation Module
//!
//! Joins extracted events with their nearest resource samples and writes
//! the results.
//!
//! # Components
//!
//! - [`aligner`]: Nearest-sample lookup and cpu/mem series selection
//! - [`report`]: `events.csv` and `summary.txt` writers
//! - [`pipeline`]: Single-pass run over one job's inputs

pub mod aligner;
pub mod pipeline;
pub mod report;

pub use aligner::{align_events, nearest_sample, select_series, AlignedEvent};
pub use pipeline::{run, RunOptions, RunOutputs, EVENTS_CSV, SUMMARY_TXT};
pub use report::{write_events_csv, write_summary, EVENTS_CSV_HEADER};
