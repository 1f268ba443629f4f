//! Error Types
//!
//! Only environment failures surface as errors. Missing inputs and
//! malformed lines are absorbed by the parsers.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that abort a correlation run.
#[derive(Debug, Error)]
pub enum CorrelateError {
    /// A file or directory could not be read, created or written.
    #[error("{action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV writer failed while serializing a record.
    #[error("Failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
}

impl CorrelateError {
    /// Wraps an I/O error with the path and action that caused it.
    pub fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CorrelateError>;
