//! Profile lookups for the signed-in member.

use std::sync::Arc;

use fitfeed_core::auth::AuthState;
use fitfeed_core::error::{FitfeedError, Result};
use fitfeed_core::profile::{Profile, ProfileRepository};

pub struct ProfileService {
    repository: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    /// Fetches any member's profile.
    pub async fn profile(&self, profile_id: &str) -> Result<Profile> {
        self.repository
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| FitfeedError::not_found("profile", profile_id))
    }

    /// Fetches the profile of the user in `auth`.
    ///
    /// Profiles are keyed by the auth user id.
    pub async fn current_profile(&self, auth: &AuthState) -> Result<Profile> {
        let user_id = auth
            .user_id()
            .ok_or_else(|| FitfeedError::invalid_input("no signed-in user"))?;
        tracing::debug!("[ProfileService] Loading profile for {}", user_id);
        self.profile(user_id).await
    }
}
