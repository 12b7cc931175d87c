//! Community and profile repositories over the hosted REST data API.
//!
//! Filters use the PostgREST query syntax (`column=eq.value`). Responses are
//! decoded one row at a time: rows that are malformed or fail validation
//! are skipped when listing and reported when a single row was requested.

use async_trait::async_trait;
use fitfeed_core::community::{
    CommunityRepository, Post, PostRow, Reply, ReplyRow, validate_row, validate_rows,
};
use fitfeed_core::error::{FitfeedError, Result};
use fitfeed_core::profile::{Profile, ProfileRepository, ProfileRow};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::client::{SupabaseClient, check_status};

const POSTS_PATH: &str = "/rest/v1/posts";
const REPLIES_PATH: &str = "/rest/v1/replies";
const PROFILES_PATH: &str = "/rest/v1/profiles";

/// Post columns plus the embedded author profile.
const POST_SELECT: &str =
    "post_id,title,content,tags,stats,created_at,profile_id,profiles(profile_id,name,username,avatar)";
const REPLY_SELECT: &str =
    "reply_id,post_id,content,created_at,profile_id,profiles(profile_id,name,username,avatar)";

pub struct SupabaseRestClient {
    client: SupabaseClient,
}

impl SupabaseRestClient {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn fetch_rows(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(path)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response)
            .await
            .map_err(|message| FitfeedError::data_access(format!("{}: {}", path, message)))?;
        response.json::<Vec<Value>>().await.map_err(transport_error)
    }
}

fn transport_error(err: reqwest::Error) -> FitfeedError {
    FitfeedError::data_access(format!("data request failed: {}", err))
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

/// Keeps the valid rows and logs the rest.
fn keep_valid<R, T>(entity: &str, rows: Vec<Value>) -> Vec<T>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = FitfeedError>,
{
    let (valid, rejected) = validate_rows::<R, T>(rows);
    for err in &rejected {
        tracing::warn!("[SupabaseRestClient] Skipping invalid {} row: {}", entity, err);
    }
    valid
}

/// Validates the first row of a single-row lookup.
fn first_valid<R, T>(rows: Vec<Value>) -> Result<Option<T>>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = FitfeedError>,
{
    match rows.into_iter().next() {
        Some(row) => validate_row::<R, T>(row)
            .map(Some)
            .map_err(|e| FitfeedError::data_access(e.to_string())),
        None => Ok(None),
    }
}

#[async_trait]
impl CommunityRepository for SupabaseRestClient {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = self
            .fetch_rows(
                POSTS_PATH,
                &[
                    ("select", POST_SELECT.to_string()),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await?;
        tracing::debug!("[SupabaseRestClient] Fetched {} post rows", rows.len());
        Ok(keep_valid::<PostRow, Post>("post", rows))
    }

    async fn get_post(&self, post_id: &str) -> Result<Option<Post>> {
        let rows = self
            .fetch_rows(
                POSTS_PATH,
                &[
                    ("select", POST_SELECT.to_string()),
                    ("post_id", eq(post_id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        first_valid::<PostRow, Post>(rows)
    }

    async fn list_replies(&self, post_id: &str) -> Result<Vec<Reply>> {
        let rows = self
            .fetch_rows(
                REPLIES_PATH,
                &[
                    ("select", REPLY_SELECT.to_string()),
                    ("post_id", eq(post_id)),
                    ("order", "created_at.asc".to_string()),
                ],
            )
            .await?;
        Ok(keep_valid::<ReplyRow, Reply>("reply", rows))
    }
}

#[async_trait]
impl ProfileRepository for SupabaseRestClient {
    async fn get_profile(&self, profile_id: &str) -> Result<Option<Profile>> {
        let rows = self
            .fetch_rows(
                PROFILES_PATH,
                &[
                    ("select", "*".to_string()),
                    ("profile_id", eq(profile_id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        first_valid::<ProfileRow, Profile>(rows)
    }
}
