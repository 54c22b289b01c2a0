// src/discord/models.rs
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Discord user object as embedded in a guild member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Guild member from GET /guilds/{guild.id}/members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMember {
    pub user: DiscordUser,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub joined_at: Option<String>,
}

impl GuildMember {
    pub fn has_role(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r == role_id)
    }

    /// Join time in milliseconds since the epoch.
    ///
    /// Missing or unparseable timestamps count as 0 so they sort first.
    pub fn joined_at_millis(&self) -> i64 {
        self.joined_at
            .as_deref()
            .and_then(parse_timestamp_millis)
            .unwrap_or(0)
    }
}

/// Guild role from GET /guilds/{guild.id}/roles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRole {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<u32>,
}

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date as midnight UTC
fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
