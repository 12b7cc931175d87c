//! File-backed key-value store.
//!
//! Each key is one `<key>.json` file under the store directory. Writes are
//! atomic per key; a process-wide async mutex serialises writers so a
//! `set` racing a `delete` on the same key cannot interleave.

use std::path::PathBuf;

use async_trait::async_trait;
use fitfeed_core::error::{FitfeedError, Result};
use fitfeed_core::storage::KeyValueStore;
use tokio::sync::Mutex;

use super::atomic_file::{read_optional, remove_optional, write_atomic};

pub struct FileKeyValueStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            write_lock: Mutex::new(()),
        }
    }

    /// Directory holding the slot files.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(FitfeedError::invalid_input(format!("invalid storage key '{}'", key)))
    }
}

fn persistence_error(action: &str, key: &str, err: std::io::Error) -> FitfeedError {
    FitfeedError::persistence(format!("failed to {} '{}': {}", action, key, err))
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        read_optional(&path)
            .await
            .map_err(|e| persistence_error("read", key, e))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        let _guard = self.write_lock.lock().await;
        write_atomic(&path, value)
            .await
            .map_err(|e| persistence_error("write", key, e))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        let _guard = self.write_lock.lock().await;
        remove_optional(&path)
            .await
            .map_err(|e| persistence_error("delete", key, e))
    }
}
