//! Profile repository trait.

use async_trait::async_trait;

use super::model::Profile;
use crate::error::Result;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetches a profile by id, or `None` if no row matches.
    async fn get_profile(&self, profile_id: &str) -> Result<Option<Profile>>;
}
