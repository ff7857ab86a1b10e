//! Filesystem port for whole-document reads and writes.

use std::future::Future;
use std::io;
use std::path::Path;
use std::pin::Pin;

/// Boxed future type alias used by [`FileSystem`] to keep the trait dyn-compatible.
pub type FsFuture<'a, T> = Pin<Box<dyn Future<Output = io::Result<T>> + Send + 'a>>;

/// Provides asynchronous file access for the task and memory stores.
///
/// Stores only ever read a document in full and write it back in full.
/// A missing file must surface as [`io::ErrorKind::NotFound`]; the stores
/// treat that kind (and only that kind) as an empty document.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string<'a>(&'a self, path: &'a Path) -> FsFuture<'a, String>;

    /// Replaces the file with `contents`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write<'a>(&'a self, path: &'a Path, contents: &'a str) -> FsFuture<'a, ()>;

    /// Returns `true` if the path exists.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined (e.g. permissions).
    fn exists<'a>(&'a self, path: &'a Path) -> FsFuture<'a, bool>;

    /// Lists the file names in a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir<'a>(&'a self, path: &'a Path) -> FsFuture<'a, Vec<String>>;
}
