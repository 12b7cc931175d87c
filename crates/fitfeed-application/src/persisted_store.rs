//! In-memory state mirrored to a durable key-value slot.
//!
//! A [`PersistedStore`] owns one typed value. Reads are served from memory;
//! every mutation writes the whole value back to its slot inside a
//! [`StoredRecord`] envelope before returning. The slot is read once, when
//! the store is loaded, and an unreadable slot never prevents start-up.

use std::sync::Arc;

use fitfeed_core::error::{FitfeedError, Result};
use fitfeed_core::storage::{KeyValueStore, STORED_RECORD_VERSION, StoredRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, watch};

/// Bounds shared by every value a [`PersistedStore`] can hold.
pub trait StoreState:
    Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> StoreState for T where
    T: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Typed state container backed by a named key-value slot.
///
/// Subscribers receive every in-memory change through a `watch` channel,
/// including changes to fields the envelope does not persist.
pub struct PersistedStore<T: StoreState> {
    key: String,
    backend: Arc<dyn KeyValueStore>,
    state: watch::Sender<T>,
    /// Serializes writes so the slot always holds the latest in-memory value.
    write_lock: Mutex<()>,
}

impl<T: StoreState> PersistedStore<T> {
    /// Reads the slot named `key` and builds the store from it.
    ///
    /// An empty slot yields `T::default()`. A slot that cannot be read,
    /// does not parse, or carries another record version is logged and
    /// also yields the default; this function does not fail.
    pub async fn load(key: impl Into<String>, backend: Arc<dyn KeyValueStore>) -> Self {
        let key = key.into();
        let initial = Self::rehydrate(&key, backend.as_ref()).await;
        let (state, _) = watch::channel(initial);
        Self {
            key,
            backend,
            state,
            write_lock: Mutex::new(()),
        }
    }

    async fn rehydrate(key: &str, backend: &dyn KeyValueStore) -> T {
        let raw = match backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("[PersistedStore] No stored value for '{}', using default", key);
                return T::default();
            }
            Err(e) => {
                tracing::warn!(
                    "[PersistedStore] Failed to read '{}', using default: {}",
                    key,
                    e
                );
                return T::default();
            }
        };

        match serde_json::from_str::<StoredRecord<T>>(&raw) {
            Ok(record) if record.version == STORED_RECORD_VERSION => {
                tracing::debug!("[PersistedStore] Rehydrated '{}'", key);
                record.state
            }
            Ok(record) => {
                tracing::warn!(
                    "[PersistedStore] '{}' has record version {} (expected {}), using default",
                    key,
                    record.version,
                    STORED_RECORD_VERSION
                );
                T::default()
            }
            Err(e) => {
                tracing::warn!(
                    "[PersistedStore] Stored value for '{}' is corrupt, using default: {}",
                    key,
                    e
                );
                T::default()
            }
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns a snapshot of the current state.
    pub fn get_state(&self) -> T {
        self.state.borrow().clone()
    }

    /// Returns a receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.state.subscribe()
    }

    /// Applies `f` to the state and writes the result to the slot.
    ///
    /// The in-memory value is updated first and stays updated when the
    /// write fails; the failure is logged and returned as
    /// [`FitfeedError::Persistence`].
    pub async fn mutate<F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut T),
    {
        let _guard = self.write_lock.lock().await;
        self.state.send_modify(f);
        let next = self.get_state();
        self.persist(&next).await?;
        Ok(next)
    }

    /// Applies `f` in memory only.
    ///
    /// For fields that are skipped by serialization (loading flags, last
    /// errors); writing them would leave the slot unchanged.
    pub fn update_transient<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.state.send_modify(f);
    }

    /// Deletes the slot and reverts the in-memory state to the default.
    ///
    /// The in-memory state is reverted even if the delete fails.
    pub async fn reset(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.state.send_replace(T::default());
        self.backend.delete(&self.key).await.map_err(|e| {
            tracing::error!("[PersistedStore] Failed to delete '{}': {}", self.key, e);
            as_persistence(e)
        })?;
        tracing::info!("[PersistedStore] Cleared '{}'", self.key);
        Ok(())
    }

    async fn persist(&self, state: &T) -> Result<()> {
        let text = serde_json::to_string(&StoredRecord::new(state)).map_err(|e| {
            tracing::error!("[PersistedStore] Failed to serialize '{}': {}", self.key, e);
            FitfeedError::persistence(format!("failed to serialize '{}': {}", self.key, e))
        })?;
        self.backend.set(&self.key, &text).await.map_err(|e| {
            tracing::error!("[PersistedStore] Failed to write '{}': {}", self.key, e);
            as_persistence(e)
        })
    }
}

fn as_persistence(err: FitfeedError) -> FitfeedError {
    if err.is_persistence() {
        err
    } else {
        FitfeedError::persistence(err.to_string())
    }
}
