pub mod logging;
pub mod paths;
pub mod storage;
pub mod supabase;

pub use crate::logging::{LogGuard, init_logging};
pub use crate::paths::FitfeedPaths;
pub use crate::storage::{
    ConfigStorage, FileKeyValueStore, MemoryKeyValueStore, SecretStorage, SecretStorageError,
};
pub use crate::supabase::{SupabaseAuthClient, SupabaseClient, SupabaseRestClient};
