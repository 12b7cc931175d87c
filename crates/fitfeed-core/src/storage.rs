//! Durable key-value persistence contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Slot holding the auth/session store.
pub const AUTH_STORE_KEY: &str = "auth-store";

/// Slot holding the display mode store.
pub const MODE_STORE_KEY: &str = "mode-store";

/// Current version written into every [`StoredRecord`].
pub const STORED_RECORD_VERSION: u32 = 0;

/// Durable string-to-string storage shared by the persisted stores.
///
/// Each store owns a disjoint key, so implementations need no cross-key
/// transactions. Values are opaque text; the stores write JSON.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if the slot is empty.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an empty slot is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Envelope wrapped around every persisted state value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord<T> {
    pub state: T,
    pub version: u32,
}

impl<T> StoredRecord<T> {
    /// Wraps `state` with the current record version.
    pub fn new(state: T) -> Self {
        Self {
            state,
            version: STORED_RECORD_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_envelope_shape() {
        let record = StoredRecord::new(serde_json::json!({ "mode": "dark" }));
        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"state":{"mode":"dark"},"version":0}"#);
    }
}
