//! Display mode preference store.

use std::sync::Arc;

use fitfeed_core::error::Result;
use fitfeed_core::mode::{ColorScheme, ModePreference, ModeState};
use fitfeed_core::storage::{KeyValueStore, MODE_STORE_KEY};
use tokio::sync::watch;

use crate::persisted_store::PersistedStore;

/// Holds the user's light/dark/system choice. Local only.
pub struct ModeStore {
    store: PersistedStore<ModeState>,
}

impl ModeStore {
    pub async fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        let store = PersistedStore::<ModeState>::load(MODE_STORE_KEY, backend).await;
        tracing::debug!("[ModeStore] Loaded (mode: {})", store.get_state().mode);
        Self { store }
    }

    pub fn mode(&self) -> ModePreference {
        self.store.get_state().mode
    }

    /// Scheme to render with, given what the OS currently reports.
    pub fn color_scheme(&self, system: ColorScheme) -> ColorScheme {
        self.mode().resolve(system)
    }

    pub fn subscribe(&self) -> watch::Receiver<ModeState> {
        self.store.subscribe()
    }

    /// Sets the preference. The new mode is applied even if it could not be
    /// saved; the write error is returned for logging.
    pub async fn set_mode(&self, mode: ModePreference) -> Result<()> {
        self.store.mutate(|state| state.mode = mode).await?;
        tracing::info!("[ModeStore] Mode set to {}", mode);
        Ok(())
    }
}
