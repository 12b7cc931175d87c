//! Atomic text file writes.
//!
//! Every write goes to a uniquely named temp file in the target directory,
//! is fsynced, and is then renamed over the target, so readers only ever see
//! the old or the new contents.

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

/// Writes `contents` to `path` atomically, creating parent directories.
pub async fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Path has no parent directory")
    })?;
    fs::create_dir_all(parent).await?;

    let tmp_path = temp_path(parent, path)?;
    let result = write_and_rename(&tmp_path, path, contents).await;
    if result.is_err() {
        // Leftover temp files are harmless but untidy.
        let _ = fs::remove_file(&tmp_path).await;
    }
    result
}

async fn write_and_rename(tmp_path: &Path, path: &Path, contents: &str) -> std::io::Result<()> {
    let mut tmp_file = File::create(tmp_path).await?;
    tmp_file.write_all(contents.as_bytes()).await?;
    tmp_file.sync_all().await?;
    drop(tmp_file);

    fs::rename(tmp_path, path).await
}

/// Reads `path`, returning `None` when the file does not exist.
pub async fn read_optional(path: &Path) -> std::io::Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Removes `path`, treating a missing file as success.
pub async fn remove_optional(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn temp_path(parent: &Path, path: &Path) -> std::io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Path has no file name")
    })?;
    let tmp_name = format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        uuid::Uuid::new_v4().simple()
    );
    Ok(parent.join(tmp_name))
}
