//! Whole-document JSON persistence shared by the task and memory stores.
//!
//! Every store file is read in full and rewritten in full. Documents are
//! pretty-printed with two-space indentation. A missing file reads as
//! `None`; any other I/O failure or malformed JSON is an error.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::ports::FileSystem;

/// A single JSON document addressed by path.
///
/// All I/O goes through the `FileSystem` port so the same code runs against
/// the live disk adapter and the in-memory one.
pub struct JsonDocument<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl<'a> JsonDocument<'a> {
    /// Creates a handle for the document at `path`.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, path: &Path) -> Self {
        Self {
            fs,
            path: path.to_path_buf(),
        }
    }

    /// Loads and parses the document; `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse as `T`.
    pub async fn load<T: DeserializeOwned>(&self) -> StoreResult<Option<T>> {
        let raw = match self.fs.read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "document missing, treating as empty");
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Serializes `value` and replaces the document with it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save<T: Serialize + ?Sized>(&self, value: &T) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.fs
            .write(&self.path, &json)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), bytes = json.len(), "document written");
        Ok(())
    }
}
