//! Live filesystem adapter using `tokio::fs`.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ports::filesystem::{FileSystem, FsFuture};

/// Sequence number for temporary file names within this process.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Live filesystem adapter backed by real disk I/O.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so readers never observe a half-written document. Every write
/// uses its own temporary file, so concurrent writers never share one.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string<'a>(&'a self, path: &'a Path) -> FsFuture<'a, String> {
        Box::pin(tokio::fs::read_to_string(path))
    }

    fn write<'a>(&'a self, path: &'a Path, contents: &'a str) -> FsFuture<'a, ()> {
        Box::pin(async move {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let tmp = temp_path(path)?;
            tokio::fs::write(&tmp, contents).await?;
            if let Err(err) = tokio::fs::rename(&tmp, path).await {
                let _ = tokio::fs::remove_file(&tmp).await;
                return Err(err);
            }
            Ok(())
        })
    }

    fn exists<'a>(&'a self, path: &'a Path) -> FsFuture<'a, bool> {
        Box::pin(tokio::fs::try_exists(path))
    }

    fn list_dir<'a>(&'a self, path: &'a Path) -> FsFuture<'a, Vec<String>> {
        Box::pin(async move {
            let mut entries = Vec::new();
            let mut dir = tokio::fs::read_dir(path).await?;
            while let Some(entry) = dir.next_entry().await? {
                if let Some(name) = entry.file_name().to_str() {
                    entries.push(name.to_string());
                }
            }
            entries.sort();
            Ok(entries)
        })
    }
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        let message = format!("not a file path: {}", path.display());
        io::Error::new(io::ErrorKind::InvalidInput, message)
    })?;
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        ".{}.{}.{seq}.tmp",
        name.to_string_lossy(),
        std::process::id()
    );
    Ok(path.with_file_name(tmp_name))
}
