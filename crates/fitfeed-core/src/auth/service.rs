//! Remote authentication service contract.

use async_trait::async_trait;

use super::model::{OAuthProvider, Session};
use crate::error::Result;

/// Remote authentication service.
///
/// Every operation either yields a session (or `None` when the service
/// accepted the request without issuing one) or fails with
/// `FitfeedError::RemoteAuth` carrying the service's message.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Signs in with email and password.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Option<Session>>;

    /// Registers a new account.
    ///
    /// Returns `Ok(None)` when the account was created but must confirm its
    /// email before a session is issued.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>>;

    /// Exchanges an identity token from a social provider for a session.
    async fn sign_in_with_id_token(
        &self,
        provider: OAuthProvider,
        id_token: &str,
    ) -> Result<Option<Session>>;

    /// Revokes `session` on the server.
    async fn sign_out(&self, session: &Session) -> Result<()>;
}
