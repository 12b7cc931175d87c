//! Community post and reply models.
//!
//! Rows arrive from the remote data service with every field optional.
//! They are validated once here into [`Post`] and [`Reply`], filling the
//! documented defaults, so no caller has to guard individual fields.

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{FitfeedError, Result};
use crate::relative_date::parse_timestamp;

/// Display name used when a row carries no author information.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Identifier that the backend may send as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl RowId {
    pub fn into_string(self) -> String {
        match self {
            RowId::Int(value) => value.to_string(),
            RowId::Text(value) => value,
        }
    }
}

/// Embedded author columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRow {
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostStatsRow {
    /// Numeric column; some rows send it as a float.
    #[serde(default)]
    pub likes: Option<f64>,
}

/// Raw `posts` row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostRow {
    #[serde(default)]
    pub post_id: Option<RowId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub stats: Option<PostStatsRow>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub profile_id: Option<String>,
    /// Author profile embedded by the query.
    #[serde(default)]
    pub profiles: Option<AuthorRow>,
}

/// Raw `replies` row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRow {
    #[serde(default)]
    pub reply_id: Option<RowId>,
    #[serde(default)]
    pub post_id: Option<RowId>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub profiles: Option<AuthorRow>,
}

/// Who wrote a post or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub profile_id: Option<String>,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl AuthorRef {
    fn from_row(profile_id: Option<String>, row: Option<AuthorRow>) -> Self {
        let row = row.unwrap_or_default();
        let display_name = row
            .name
            .or(row.username)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        Self {
            profile_id: profile_id.or(row.profile_id),
            display_name,
            avatar_url: row.avatar,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStats {
    pub likes: u64,
}

/// Validated community post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub stats: PostStats,
    pub created_at: DateTime<FixedOffset>,
    pub author: AuthorRef,
}

/// Validated reply to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: Option<String>,
    pub post_id: String,
    pub content: String,
    pub created_at: DateTime<FixedOffset>,
    pub author: AuthorRef,
}

/// Floors a numeric count, treating missing or negative values as zero.
pub fn count_or_zero(value: Option<f64>) -> u64 {
    match value {
        Some(count) if count.is_finite() && count > 0.0 => count.floor() as u64,
        _ => 0,
    }
}

fn required_timestamp(entity: &str, value: Option<String>) -> Result<DateTime<FixedOffset>> {
    let raw = value.ok_or_else(|| {
        FitfeedError::invalid_input(format!("{} row is missing created_at", entity))
    })?;
    parse_timestamp(&raw)
}

impl TryFrom<PostRow> for Post {
    type Error = FitfeedError;

    fn try_from(row: PostRow) -> Result<Self> {
        let id = row
            .post_id
            .map(RowId::into_string)
            .ok_or_else(|| FitfeedError::invalid_input("post row is missing post_id"))?;
        let created_at = required_timestamp("post", row.created_at)?;
        let likes = count_or_zero(row.stats.and_then(|stats| stats.likes));

        Ok(Self {
            id,
            title: row.title.unwrap_or_default(),
            content: row.content.unwrap_or_default(),
            tags: row.tags.unwrap_or_default(),
            stats: PostStats { likes },
            created_at,
            author: AuthorRef::from_row(row.profile_id, row.profiles),
        })
    }
}

impl TryFrom<ReplyRow> for Reply {
    type Error = FitfeedError;

    fn try_from(row: ReplyRow) -> Result<Self> {
        let post_id = row
            .post_id
            .map(RowId::into_string)
            .ok_or_else(|| FitfeedError::invalid_input("reply row is missing post_id"))?;
        let created_at = required_timestamp("reply", row.created_at)?;

        Ok(Self {
            id: row.reply_id.map(RowId::into_string),
            post_id,
            content: row.content.unwrap_or_default(),
            created_at,
            author: AuthorRef::from_row(row.profile_id, row.profiles),
        })
    }
}

/// Decodes and validates one raw JSON row.
///
/// A row whose fields have the wrong shape is rejected the same way as a
/// row that fails validation.
pub fn validate_row<R, T>(value: serde_json::Value) -> Result<T>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = FitfeedError>,
{
    let row: R = serde_json::from_value(value)
        .map_err(|e| FitfeedError::invalid_input(format!("malformed row: {}", e)))?;
    T::try_from(row)
}

/// Converts every row, separating the valid values from the rejected ones.
pub fn validate_rows<R, T>(rows: Vec<serde_json::Value>) -> (Vec<T>, Vec<FitfeedError>)
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = FitfeedError>,
{
    let mut valid = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();
    for row in rows {
        match validate_row::<R, T>(row) {
            Ok(value) => valid.push(value),
            Err(e) => rejected.push(e),
        }
    }
    (valid, rejected)
}
