//! In-memory revalidation cache for Discord listings
//!
//! Successful listings are served from memory until they are older than the
//! revalidation window. Failed fetches are never stored.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use super::client::GuildDirectory;
use super::models::{GuildMember, GuildRole};
use crate::error::Result;

struct CacheEntry<T> {
    fetched_at: Instant,
    value: Vec<T>,
}

impl<T: Clone> CacheEntry<T> {
    fn fresh(&self, window: Duration) -> Option<Vec<T>> {
        (self.fetched_at.elapsed() < window).then(|| self.value.clone())
    }
}

/// Wraps a directory and reuses its listings for the revalidation window
pub struct CachedDirectory<D> {
    inner: D,
    window: Duration,
    members: RwLock<HashMap<(String, u16), CacheEntry<GuildMember>>>,
    roles: RwLock<HashMap<String, CacheEntry<GuildRole>>>,
}

impl<D: GuildDirectory> CachedDirectory<D> {
    pub fn new(inner: D, window: Duration) -> Self {
        Self {
            inner,
            window,
            members: RwLock::new(HashMap::new()),
            roles: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<D: GuildDirectory> GuildDirectory for CachedDirectory<D> {
    async fn list_members(
        &self,
        guild_id: &str,
        token: &str,
        limit: u16,
    ) -> Result<Vec<GuildMember>> {
        let key = (guild_id.to_string(), limit);

        if let Some(hit) = self
            .members
            .read()
            .await
            .get(&key)
            .and_then(|e| e.fresh(self.window))
        {
            debug!("Serving members of guild {} from cache", guild_id);
            return Ok(hit);
        }

        let value = self.inner.list_members(guild_id, token, limit).await?;
        if !self.window.is_zero() {
            self.members.write().await.insert(
                key,
                CacheEntry {
                    fetched_at: Instant::now(),
                    value: value.clone(),
                },
            );
        }
        Ok(value)
    }

    async fn list_roles(&self, guild_id: &str, token: &str) -> Result<Vec<GuildRole>> {
        if let Some(hit) = self
            .roles
            .read()
            .await
            .get(guild_id)
            .and_then(|e| e.fresh(self.window))
        {
            debug!("Serving roles of guild {} from cache", guild_id);
            return Ok(hit);
        }

        let value = self.inner.list_roles(guild_id, token).await?;
        if !self.window.is_zero() {
            self.roles.write().await.insert(
                guild_id.to_string(),
                CacheEntry {
                    fetched_at: Instant::now(),
                    value: value.clone(),
                },
            );
        }
        Ok(value)
    }
}
