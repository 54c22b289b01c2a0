//! Upstream Discord directory: REST client, response models and revalidation cache

mod cache;
mod client;
pub(crate) mod models;

pub use cache::CachedDirectory;
pub use client::{DiscordDirectory, GuildDirectory};
pub use models::{GuildMember, GuildRole};
