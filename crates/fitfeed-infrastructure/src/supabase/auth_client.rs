//! Remote auth service backed by the hosted auth REST API.

use async_trait::async_trait;
use fitfeed_core::auth::{AuthService, OAuthProvider, Session};
use fitfeed_core::error::{FitfeedError, Result};
use serde_json::{Value, json};

use super::client::{SupabaseClient, check_status};

const TOKEN_PATH: &str = "/auth/v1/token";
const SIGNUP_PATH: &str = "/auth/v1/signup";
const LOGOUT_PATH: &str = "/auth/v1/logout";

pub struct SupabaseAuthClient {
    client: SupabaseClient,
}

impl SupabaseAuthClient {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn request_session(
        &self,
        path: &str,
        grant_type: Option<&str>,
        body: Value,
    ) -> Result<Option<Session>> {
        let mut request = self.client.post(path).json(&body);
        if let Some(grant_type) = grant_type {
            request = request.query(&[("grant_type", grant_type)]);
        }

        let response = request.send().await.map_err(transport_error)?;
        let response = check_status(response).await.map_err(FitfeedError::remote_auth)?;
        let payload: Value = response.json().await.map_err(transport_error)?;
        session_from_payload(payload)
    }
}

fn transport_error(err: reqwest::Error) -> FitfeedError {
    FitfeedError::remote_auth(format!("auth request failed: {}", err))
}

/// A payload without an access token (e.g. sign-up awaiting email
/// confirmation returns only the user) carries no session.
fn session_from_payload(payload: Value) -> Result<Option<Session>> {
    if payload.get("access_token").is_none() {
        return Ok(None);
    }
    serde_json::from_value(payload)
        .map(Some)
        .map_err(|e| FitfeedError::remote_auth(format!("malformed session: {}", e)))
}

#[async_trait]
impl AuthService for SupabaseAuthClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Option<Session>> {
        tracing::debug!("[SupabaseAuthClient] Password sign-in");
        self.request_session(
            TOKEN_PATH,
            Some("password"),
            json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>> {
        tracing::debug!("[SupabaseAuthClient] Sign-up");
        self.request_session(
            SIGNUP_PATH,
            None,
            json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn sign_in_with_id_token(
        &self,
        provider: OAuthProvider,
        id_token: &str,
    ) -> Result<Option<Session>> {
        tracing::debug!("[SupabaseAuthClient] ID token sign-in via {}", provider);
        self.request_session(
            TOKEN_PATH,
            Some("id_token"),
            json!({ "provider": provider.as_ref(), "id_token": id_token }),
        )
        .await
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        tracing::debug!("[SupabaseAuthClient] Sign-out");
        let response = self
            .client
            .post_as(LOGOUT_PATH, &session.access_token)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await.map_err(FitfeedError::remote_auth)?;
        Ok(())
    }
}
