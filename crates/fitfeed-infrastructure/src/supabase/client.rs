//! Shared HTTP plumbing for the hosted backend.

use std::time::Duration;

use fitfeed_core::config::{BackendConfig, BackendSecret};
use fitfeed_core::error::{FitfeedError, Result};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;

/// Per-request timeout applied by the HTTP client itself.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL, key and connection pool shared by the auth and REST clients.
#[derive(Clone)]
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
}

impl SupabaseClient {
    /// Creates a client for `base_url` authenticated with `anon_key`.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(FitfeedError::config("backend url is not configured"));
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FitfeedError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url,
            anon_key: anon_key.into(),
            http,
        })
    }

    /// Builds a client from config.toml and secret.json sections.
    pub fn from_config(backend: &BackendConfig, secret: &BackendSecret) -> Result<Self> {
        if secret.anon_key.is_empty() {
            return Err(FitfeedError::config("backend anon_key is missing from secret.json"));
        }
        Self::new(backend.url.clone(), secret.anon_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET with the project key attached.
    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.with_key(self.http.get(self.url(path)))
    }

    /// POST with the project key attached.
    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.with_key(self.http.post(self.url(path)))
    }

    /// POST authorised as the holder of `access_token` instead of the
    /// anonymous project role.
    pub(crate) fn post_as(&self, path: &str, access_token: &str) -> RequestBuilder {
        self.http
            .post(self.url(path))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }
}

/// Error body shapes returned by the backend's services.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Extracts the most specific human-readable message from an error body.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {}", status))
}

/// Returns the response on 2xx, otherwise the body's message.
pub(crate) async fn check_status(response: Response) -> std::result::Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_message(status, &body))
}
