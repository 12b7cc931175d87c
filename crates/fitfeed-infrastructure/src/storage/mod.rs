//! Storage layer: key-value slots, config and secret files.

mod atomic_file;
mod config_storage;
mod file_kv_store;
mod memory_kv_store;
mod secret_storage;

pub use config_storage::ConfigStorage;
pub use file_kv_store::FileKeyValueStore;
pub use memory_kv_store::MemoryKeyValueStore;
pub use secret_storage::{SecretStorage, SecretStorageError};
