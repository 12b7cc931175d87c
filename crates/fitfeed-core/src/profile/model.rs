//! User profile model.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::community::count_or_zero;
use crate::error::{FitfeedError, Result};
use crate::relative_date::parse_timestamp;

/// Raw activity counters embedded in a `profiles` row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStatsRow {
    #[serde(default)]
    pub followers: Option<f64>,
    #[serde(default)]
    pub following: Option<f64>,
}

/// Follower counters; absent counters are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub followers: u64,
    pub following: u64,
}

impl From<ProfileStatsRow> for ProfileStats {
    fn from(row: ProfileStatsRow) -> Self {
        Self {
            followers: count_or_zero(row.followers),
            following: count_or_zero(row.following),
        }
    }
}

/// Raw `profiles` row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub stats: Option<ProfileStatsRow>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Validated profile of a community member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub profile_id: String,
    pub avatar: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    /// Height in centimetres.
    pub height: Option<f64>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    pub instagram: Option<String>,
    pub stats: ProfileStats,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

fn optional_timestamp(value: Option<String>) -> Result<Option<DateTime<FixedOffset>>> {
    value.as_deref().map(parse_timestamp).transpose()
}

impl TryFrom<ProfileRow> for Profile {
    type Error = FitfeedError;

    fn try_from(row: ProfileRow) -> Result<Self> {
        let profile_id = row
            .profile_id
            .ok_or_else(|| FitfeedError::invalid_input("profile row is missing profile_id"))?;

        Ok(Self {
            profile_id,
            avatar: row.avatar,
            name: row.name,
            username: row.username,
            bio: row.bio,
            role: row.role,
            gender: row.gender,
            age: row.age,
            height: row.height,
            weight: row.weight,
            instagram: row.instagram,
            stats: row.stats.map(ProfileStats::from).unwrap_or_default(),
            created_at: optional_timestamp(row.created_at)?,
            updated_at: optional_timestamp(row.updated_at)?,
        })
    }
}
