use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REVALIDATE_SECS: u64 = 3600;

/// Settings for the Discord REST client
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the Discord REST API, without trailing slash
    pub api_base: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long a successful listing may be served from memory (zero disables caching)
    pub revalidate: Duration,
}

impl UpstreamConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("DISCORD_API_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            timeout: Duration::from_secs(
                std::env::var("UPSTREAM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            revalidate: Duration::from_secs(
                std::env::var("REVALIDATE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_REVALIDATE_SECS),
            ),
        }
    }
}
