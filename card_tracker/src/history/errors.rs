//! Hand history error types.

use std::path::PathBuf;
use thiserror::Error;

/// Hand history errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Log directory could not be created
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be appended
    #[error("Failed to append to {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Recorder refused the record for another reason
    #[error("Hand record rejected: {0}")]
    Rejected(String),
}

/// Result type for hand history operations
pub type HistoryResult<T> = Result<T, HistoryError>;
