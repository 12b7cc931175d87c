//! Application layer: persisted stores, feed use cases and the composition root.

pub mod auth_store;
pub mod community_feed;
pub mod context;
pub mod mode_store;
pub mod persisted_store;
pub mod profile_service;

pub use auth_store::AuthStore;
pub use community_feed::{CommunityFeed, PostDetail, PostSummary, ReplyView};
pub use context::{AppContext, Collaborators, start};
pub use mode_store::ModeStore;
pub use persisted_store::{PersistedStore, StoreState};
pub use profile_service::ProfileService;
