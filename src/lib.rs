//! Remora Correlate - Task Log / Resource Usage Alignment
//!
//! Joins timestamped events from a photogrammetry task runner's output log
//! with the CPU and memory samples recorded by Remora, producing a CSV for
//! offline analysis.
//!
//! # Architecture
//!
//! The library is organized into two main modules:
//!
//! - [`parsing`]: Task log events, resource series and timestamp parsing
//! - [`correlation`]: Nearest-sample alignment and report writing
//!
//! Supporting modules:
//!
//! - [`config`]: Keyword and file-name heuristics
//! - [`error`]: Crate error type
//!
//! # Example
//!
//! ```rust,no_run
//! use remora_correlate::{run, CorrelationConfig, RunOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = RunOptions {
//!         log_path: "nodeodm.log".into(),
//!         remora_dir: "remora_1234".into(),
//!         out_dir: "correlated".into(),
//!     };
//!
//!     let outputs = run(&options, &CorrelationConfig::default())?;
//!     println!("{} events", outputs.event_count);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod correlation;
pub mod error;
pub mod parsing;

// Re-export commonly used types
pub use config::{CorrelationConfig, ACTIVE_CONFIG};
pub use correlation::{run, RunOptions, RunOutputs};
pub use error::{CorrelateError, Result};
pub use parsing::{Event, Sample, SeriesTable};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "remora-correlate";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_app_name() {
        assert_eq!(APP_NAME, "remora-correlate");
    }

    #[test]
    fn test_module_exports_series_table() {
        let table = SeriesTable::new();
        assert!(table.is_empty());
    }
}
