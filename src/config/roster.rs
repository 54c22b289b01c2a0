use std::fmt;

use crate::error::{Result, RosterError};

/// Roster settings as read from the environment
///
/// Every value is optional here; `resolve` enforces that all four are present
/// before the roster can be computed.
#[derive(Clone, Default)]
pub struct RosterSettings {
    pub guild_id: Option<String>,
    pub target_role_id: Option<String>,
    pub priority_role_id: Option<String>,
    pub bot_token: Option<String>,
}

impl RosterSettings {
    /// Read settings from environment variables. Empty values count as missing.
    pub fn from_env() -> Self {
        Self {
            guild_id: non_empty_var("GUILD_ID"),
            target_role_id: non_empty_var("TARGET_ROLE_ID"),
            priority_role_id: non_empty_var("PRIORITY_ROLE_ID"),
            bot_token: non_empty_var("DISCORD_BOT_TOKEN"),
        }
    }

    /// Names of the environment variables that are not set
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("GUILD_ID", &self.guild_id),
            ("TARGET_ROLE_ID", &self.target_role_id),
            ("PRIORITY_ROLE_ID", &self.priority_role_id),
            ("DISCORD_BOT_TOKEN", &self.bot_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn resolve(&self) -> Result<RosterConfig> {
        match (
            &self.guild_id,
            &self.target_role_id,
            &self.priority_role_id,
            &self.bot_token,
        ) {
            (Some(guild_id), Some(target_role_id), Some(priority_role_id), Some(bot_token)) => {
                Ok(RosterConfig {
                    guild_id: guild_id.clone(),
                    target_role_id: target_role_id.clone(),
                    priority_role_id: priority_role_id.clone(),
                    bot_token: bot_token.clone(),
                })
            }
            _ => Err(RosterError::Configuration {
                missing: self.missing(),
            }),
        }
    }
}

impl fmt::Debug for RosterSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RosterSettings")
            .field("guild_id", &self.guild_id)
            .field("target_role_id", &self.target_role_id)
            .field("priority_role_id", &self.priority_role_id)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Fully resolved roster configuration
#[derive(Clone)]
pub struct RosterConfig {
    pub guild_id: String,
    /// Role whose holders make up the roster
    pub target_role_id: String,
    /// Role whose holders are listed first
    pub priority_role_id: String,
    pub bot_token: String,
}

impl fmt::Debug for RosterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RosterConfig")
            .field("guild_id", &self.guild_id)
            .field("target_role_id", &self.target_role_id)
            .field("priority_role_id", &self.priority_role_id)
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
