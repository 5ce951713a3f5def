//! Wire types returned by the watch-together server
//!
//! All types are read-only snapshots: the client never mutates them in place
//! except for the reaction counters, which are replaced wholesale from the
//! server's answer.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::reaction::Reaction;

/// User who triggered a notification or wrote a discussion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct Actor {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl Actor {
    /// Full name when set, username otherwise
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}

/// An unread (or read) discussion notification
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NotificationItem {
    pub id: u64,
    #[serde(default)]
    pub message: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    pub trigger_user: Actor,
    #[serde(default)]
    pub discussion_id: Option<u64>,
    #[serde(default)]
    pub is_read: bool,
    /// reply, like, mention, ...
    #[serde(default)]
    pub notification_type: Option<String>,
}

/// A discussion returned by the "recent" polling endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecentDiscussion {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<Actor>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub dislike_count: u32,
    #[serde(default)]
    pub user_reaction: Option<Reaction>,
}

impl RecentDiscussion {
    /// One-line summary for list rendering
    pub fn summary(&self) -> String {
        let text = self
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.message.as_deref())
            .unwrap_or("(untitled)");
        match &self.user {
            Some(user) => format!("{}: {}", user.display_name(), text.trim()),
            None => text.trim().to_string(),
        }
    }
}

/// Answer to a like/dislike/remove request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReactionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub dislike_count: u32,
    #[serde(default)]
    pub user_reaction: Option<Reaction>,
}

/// Parse server timestamps
///
/// Accepts RFC 3339 (`2024-05-01T10:00:00Z`) as well as the naive ISO form
/// the server emits for UTC columns (`2024-05-01T10:00:00.123456`).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}
