//! User account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PlayerId, UserId};

/// Compact user view cached per player uuid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Option<UserId>,
    pub username: String,
    pub uuid: PlayerId,
    pub email: Option<String>,
    #[serde(default)]
    pub coins: i32,
    #[serde(default)]
    pub gems: i32,
    #[serde(default)]
    pub experience_points: i32,
    #[serde(default)]
    pub is_full_account: bool,
    #[serde(default)]
    pub is_new_user: bool,
}

/// Full user record, also used as the seed for account creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub id: Option<UserId>,
    pub username: String,
    pub uuid: Option<PlayerId>,
    pub email: Option<String>,
    pub coins: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserDetail {
    /// Seed for creating a fresh account for a player.
    pub fn seed(uuid: PlayerId, username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            uuid: Some(uuid),
            email: None,
            coins: None,
            created_at: None,
        }
    }
}

impl UserSummary {
    pub fn new(uuid: PlayerId, username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            uuid,
            email: None,
            coins: 0,
            gems: 0,
            experience_points: 0,
            is_full_account: false,
            is_new_user: false,
        }
    }

    /// Builds the cached summary shape from a freshly created account.
    ///
    /// The API may omit the uuid in its create response; `requested` is the
    /// uuid the account was created for and fills the gap.
    pub fn from_created(created: UserDetail, requested: PlayerId) -> Self {
        Self {
            id: created.id,
            username: created.username,
            uuid: created.uuid.unwrap_or(requested),
            email: created.email,
            coins: created.coins.unwrap_or(0),
            gems: 0,
            experience_points: 0,
            is_full_account: false,
            is_new_user: true,
        }
    }
}
