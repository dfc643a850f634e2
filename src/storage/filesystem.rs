//! File system operations
//!
//! Low-level helpers the archive store is built on.

use std::io::{ErrorKind, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

/// Bytes a temp name adds around the final file name: `.`, `.<pid>-<seq>`
/// with a `u32` pid and `u64` sequence, and `.tmp`.
pub const TEMP_NAME_OVERHEAD: usize = 1 + 1 + 10 + 1 + 20 + 4;

static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Create a directory and its parents
pub async fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await
}

/// Temp file used while `final_path` is being replaced. Hidden, not ending
/// in `.json`, and unique per call so concurrent writers never share one.
pub fn temp_path_for(final_path: &Path) -> PathBuf {
    let file_name = final_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    final_path.with_file_name(format!(".{file_name}.{}-{seq}.tmp", std::process::id()))
}

/// Write `data` to `final_path` through a temp file and rename, so readers
/// see either the old or the new content.
pub async fn write_atomic(final_path: &Path, data: &[u8]) -> Result<()> {
    let tmp = temp_path_for(final_path);
    if let Err(e) = fs::write(&tmp, data).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp, final_path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}

/// Read a file to a string, mapping absence to `None`
pub async fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Remove a file, reporting whether it existed
pub async fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
