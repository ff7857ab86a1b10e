//! In-memory filesystem adapter.

use std::collections::HashMap;
use std::future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::ports::filesystem::{FileSystem, FsFuture};

/// Filesystem that keeps every document in a process-local map.
///
/// Directories are implicit: a path "exists" as a directory when any stored
/// file lives beneath it.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    /// Creates an empty in-memory filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> MutexGuard<'_, HashMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string<'a>(&'a self, path: &'a Path) -> FsFuture<'a, String> {
        let result = self.files().get(path).cloned().ok_or_else(|| {
            let message = format!("file not found: {}", path.display());
            io::Error::new(io::ErrorKind::NotFound, message)
        });
        Box::pin(future::ready(result))
    }

    fn write<'a>(&'a self, path: &'a Path, contents: &'a str) -> FsFuture<'a, ()> {
        let mut files = self.files();
        files.insert(path.to_path_buf(), contents.to_string());
        Box::pin(future::ready(Ok(())))
    }

    fn exists<'a>(&'a self, path: &'a Path) -> FsFuture<'a, bool> {
        let files = self.files();
        let found = files.contains_key(path) || has_children(&files, path);
        Box::pin(future::ready(Ok(found)))
    }

    fn list_dir<'a>(&'a self, path: &'a Path) -> FsFuture<'a, Vec<String>> {
        let files = self.files();
        let result = if has_children(&files, path) {
            let mut names: Vec<String> = files
                .keys()
                .filter(|k| k.parent() == Some(path))
                .filter_map(|k| k.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect();
            names.sort();
            Ok(names)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {}", path.display()),
            ))
        };
        Box::pin(future::ready(result))
    }
}

fn has_children(files: &HashMap<PathBuf, String>, path: &Path) -> bool {
    files.keys().any(|k| k.starts_with(path) && k != path)
}
