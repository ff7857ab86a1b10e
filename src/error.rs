//! Error types for unexpected store failures.
//!
//! Expected domain outcomes (task not found, completed task is immutable,
//! delete blocked by dependents) are values, not errors. Only I/O and
//! document corruption end up here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading or writing a store document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document could not be read for a reason other than "missing".
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The document could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A directory listing failed.
    #[error("failed to list {}: {source}", path.display())]
    List {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The document exists but is not valid JSON for its schema.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Document path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// An in-memory value could not be serialized.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable held a value that does not parse.
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        /// Environment variable name.
        name: &'static str,
        /// Raw value found.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The current directory is needed to resolve a relative path but is unavailable.
    #[error("cannot resolve relative data directory: {0}")]
    CurrentDir(#[source] io::Error),
}
