//! Registry error types.

use crate::entities::CardParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a tag registry. Lookups never fail.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registry file could not be read
    #[error("Failed to read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry file is not a JSON object of strings
    #[error("Malformed registry: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A tag maps to something that is not a card code
    #[error("Tag '{tag}' has invalid card '{value}': {source}")]
    InvalidCard {
        tag: String,
        value: String,
        #[source]
        source: CardParseError,
    },

    /// A blank tag identifier
    #[error("Registry contains a blank tag identifier")]
    BlankTag,

    /// Two keys name the same tag once surrounding whitespace is removed
    #[error("Tag '{0}' is listed more than once")]
    DuplicateTag(String),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
