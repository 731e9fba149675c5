//! Stream reader error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a channel reader. None of them stop the other channel.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Device could not be opened; the channel is abandoned
    #[error("Channel device {path} unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line was not valid UTF-8; the line is skipped
    #[error("Undecodable line: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// Reading from an open channel failed; reading is retried
    #[error("Read failed: {0}")]
    Read(#[from] std::io::Error),
}

/// Result type for reader operations
pub type ReaderResult<T> = Result<T, ReaderError>;
