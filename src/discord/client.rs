//! Discord REST access for guild member and role listings

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{GuildMember, GuildRole};
use crate::config::UpstreamConfig;
use crate::error::{Result, RosterError};

/// Read access to a guild's members and roles
#[async_trait]
pub trait GuildDirectory: Send + Sync {
    /// List up to `limit` members of the guild
    async fn list_members(&self, guild_id: &str, token: &str, limit: u16)
        -> Result<Vec<GuildMember>>;

    /// List every role of the guild
    async fn list_roles(&self, guild_id: &str, token: &str) -> Result<Vec<GuildRole>>;
}

/// Directory backed by the Discord HTTP API
#[derive(Clone)]
pub struct DiscordDirectory {
    api_base: String,
    http_client: reqwest::Client,
}

impl DiscordDirectory {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            api_base: config.api_base.clone(),
            http_client,
        })
    }

    fn guild_url(&self, guild_id: &str, resource: &str) -> String {
        format!(
            "{}/guilds/{}/{}",
            self.api_base,
            urlencoding::encode(guild_id),
            resource
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        request: reqwest::RequestBuilder,
        token: &str,
    ) -> Result<T> {
        let response = request
            .header("Authorization", format!("Bot {}", token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Discord {} request failed ({}): {}", resource, status, error_text);
            return Err(RosterError::Upstream { resource, status });
        }

        let body = response.json::<T>().await?;
        debug!("Fetched guild {} from Discord", resource);
        Ok(body)
    }
}

#[async_trait]
impl GuildDirectory for DiscordDirectory {
    async fn list_members(
        &self,
        guild_id: &str,
        token: &str,
        limit: u16,
    ) -> Result<Vec<GuildMember>> {
        let request = self
            .http_client
            .get(self.guild_url(guild_id, "members"))
            .query(&[("limit", limit)]);

        self.get_json("members", request, token).await
    }

    async fn list_roles(&self, guild_id: &str, token: &str) -> Result<Vec<GuildRole>> {
        let request = self.http_client.get(self.guild_url(guild_id, "roles"));

        self.get_json("roles", request, token).await
    }
}
