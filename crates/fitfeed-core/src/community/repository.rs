//! Community repository trait.

use async_trait::async_trait;

use super::model::{Post, Reply};
use crate::error::Result;

/// Read-only access to community posts and their replies.
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// Lists posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>>;

    /// Fetches a single post, or `None` if no post has that id.
    async fn get_post(&self, post_id: &str) -> Result<Option<Post>>;

    /// Lists replies to a post, oldest first.
    async fn list_replies(&self, post_id: &str) -> Result<Vec<Reply>>;
}
