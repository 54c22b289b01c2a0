use futures::future::try_join;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{RosterConfig, RosterSettings};
use crate::discord::{GuildDirectory, GuildMember, GuildRole};
use crate::error::Result;
use crate::models::{build_role_lookup, MemberView};

/// Upper bound on members fetched in one request
pub const MEMBER_FETCH_LIMIT: u16 = 1000;

/// Computes the public member roster of the configured guild
pub struct RosterManager {
    settings: RosterSettings,
    directory: Arc<dyn GuildDirectory>,
}

impl RosterManager {
    pub fn new(settings: RosterSettings, directory: Arc<dyn GuildDirectory>) -> Self {
        Self {
            settings,
            directory,
        }
    }

    /// Fetch members and roles, then filter, sort and enrich the roster.
    ///
    /// Fails before any Discord call when configuration is incomplete. Either
    /// listing failing fails the whole roster.
    pub async fn get_roster(&self) -> Result<Vec<MemberView>> {
        let config = self.settings.resolve()?;

        let (members, roles) = try_join(
            self.directory
                .list_members(&config.guild_id, &config.bot_token, MEMBER_FETCH_LIMIT),
            self.directory.list_roles(&config.guild_id, &config.bot_token),
        )
        .await?;

        debug!(
            "Fetched {} members and {} roles for guild {}",
            members.len(),
            roles.len(),
            config.guild_id
        );

        let roster = build_roster(members, &roles, &config);
        info!("Serving roster of {} members", roster.len());
        Ok(roster)
    }
}

/// Keep target-role holders, order them, and resolve their roles
pub fn build_roster(
    members: Vec<GuildMember>,
    roles: &[GuildRole],
    config: &RosterConfig,
) -> Vec<MemberView> {
    let lookup = build_role_lookup(roles);

    let mut listed: Vec<GuildMember> = members
        .into_iter()
        .filter(|m| m.has_role(&config.target_role_id))
        .collect();

    // Priority holders first, then by join time; stable for equal keys
    listed.sort_by_cached_key(|m| (!m.has_role(&config.priority_role_id), m.joined_at_millis()));

    listed
        .into_iter()
        .map(|m| MemberView::from_member(m, &lookup))
        .collect()
}

pub type SharedRosterManager = Arc<RosterManager>;

pub fn create_shared_roster_manager(
    settings: RosterSettings,
    directory: Arc<dyn GuildDirectory>,
) -> SharedRosterManager {
    Arc::new(RosterManager::new(settings, directory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::models::DiscordUser;
    use crate::error::RosterError;
    use crate::models::RoleView;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    struct FakeDirectory {
        members: Vec<GuildMember>,
        roles: Vec<GuildRole>,
        members_status: Option<reqwest::StatusCode>,
        roles_status: Option<reqwest::StatusCode>,
        calls: AtomicUsize,
    }

    impl FakeDirectory {
        fn new(members: Vec<GuildMember>, roles: Vec<GuildRole>) -> Self {
            Self {
                members,
                roles,
                members_status: None,
                roles_status: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GuildDirectory for FakeDirectory {
        async fn list_members(&self, guild_id: &str, token: &str, limit: u16) -> Result<Vec<GuildMember>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(guild_id, "G");
            assert_eq!(token, "token");
            assert_eq!(limit, MEMBER_FETCH_LIMIT);
            match self.members_status {
                Some(status) => Err(RosterError::Upstream {
                    resource: "members",
                    status,
                }),
                None => Ok(self.members.clone()),
            }
        }

        async fn list_roles(&self, _: &str, _: &str) -> Result<Vec<GuildRole>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.roles_status {
                Some(status) => Err(RosterError::Upstream {
                    resource: "roles",
                    status,
                }),
                None => Ok(self.roles.clone()),
            }
        }
    }

    /// Each listing only returns once the other one has started
    struct RendezvousDirectory {
        barrier: Barrier,
    }

    #[async_trait]
    impl GuildDirectory for RendezvousDirectory {
        async fn list_members(&self, _: &str, _: &str, _: u16) -> Result<Vec<GuildMember>> {
            self.barrier.wait().await;
            Ok(vec![member("A", &["TARGET"], None)])
        }

        async fn list_roles(&self, _: &str, _: &str) -> Result<Vec<GuildRole>> {
            self.barrier.wait().await;
            Ok(vec![role("R1", "@everyone", None)])
        }
    }

    fn settings() -> RosterSettings {
        RosterSettings {
            guild_id: Some("G".to_string()),
            target_role_id: Some("TARGET".to_string()),
            priority_role_id: Some("PRIORITY".to_string()),
            bot_token: Some("token".to_string()),
        }
    }

    fn member(id: &str, roles: &[&str], joined_at: Option<&str>) -> GuildMember {
        GuildMember {
            user: DiscordUser {
                id: id.to_string(),
                username: format!("user{}", id),
                global_name: None,
                avatar: None,
            },
            nick: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            joined_at: joined_at.map(str::to_string),
        }
    }

    fn role(id: &str, name: &str, color: Option<u32>) -> GuildRole {
        GuildRole {
            id: id.to_string(),
            name: name.to_string(),
            color,
        }
    }

    fn ids(roster: &[MemberView]) -> Vec<&str> {
        roster.iter().map(|m| m.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_priority_member_listed_first() {
        let directory = Arc::new(FakeDirectory::new(
            vec![
                member("A", &["TARGET", "R2"], Some("2024-01-01")),
                member("B", &["TARGET", "PRIORITY"], Some("2024-06-01")),
            ],
            vec![role("R1", "@everyone", None), role("R2", "Core", Some(16711680))],
        ));
        let manager = RosterManager::new(settings(), directory.clone());

        let roster = manager.get_roster().await.unwrap();

        assert_eq!(ids(&roster), vec!["B", "A"]);
        assert_eq!(
            roster[1].roles,
            vec![RoleView {
                id: "R2".to_string(),
                name: "Core".to_string(),
                color: Some("#ff0000".to_string()),
            }]
        );
        // Neither TARGET nor PRIORITY exists as a guild role, so both are dropped
        assert!(roster[0].roles.is_empty());
        assert_eq!(roster[0].handle, "@userB");
        assert_eq!(directory.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_configuration_makes_no_calls() {
        let directory = Arc::new(FakeDirectory::new(vec![], vec![]));
        let manager = RosterManager::new(
            RosterSettings {
                bot_token: None,
                ..settings()
            },
            directory.clone(),
        );

        let err = manager.get_roster().await.unwrap_err();

        assert!(matches!(
            err,
            RosterError::Configuration { ref missing } if missing == &vec!["DISCORD_BOT_TOKEN"]
        ));
        assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_roles_failure_fails_whole_roster() {
        let mut fake = FakeDirectory::new(vec![member("A", &["TARGET"], None)], vec![]);
        fake.roles_status = Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let manager = RosterManager::new(settings(), Arc::new(fake));

        let err = manager.get_roster().await.unwrap_err();
        assert!(matches!(err, RosterError::Upstream { resource: "roles", .. }));
    }

    #[tokio::test]
    async fn test_members_failure_fails_whole_roster() {
        let mut fake = FakeDirectory::new(vec![], vec![role("R1", "@everyone", None)]);
        fake.members_status = Some(reqwest::StatusCode::FORBIDDEN);
        let manager = RosterManager::new(settings(), Arc::new(fake));

        let err = manager.get_roster().await.unwrap_err();
        assert!(matches!(err, RosterError::Upstream { resource: "members", .. }));
    }

    #[tokio::test]
    async fn test_listings_fetched_concurrently() {
        let directory = Arc::new(RendezvousDirectory {
            barrier: Barrier::new(2),
        });
        let manager = RosterManager::new(settings(), directory);

        // Sequential fetching would leave the first listing waiting forever
        let roster = tokio::time::timeout(Duration::from_secs(2), manager.get_roster())
            .await
            .expect("listings were not fetched concurrently")
            .unwrap();

        assert_eq!(ids(&roster), vec!["A"]);
    }

    #[tokio::test]
    async fn test_empty_roster_is_ok() {
        let manager = RosterManager::new(
            settings(),
            Arc::new(FakeDirectory::new(vec![member("A", &["OTHER"], None)], vec![])),
        );

        assert!(manager.get_roster().await.unwrap().is_empty());
    }

    #[test]
    fn test_only_target_holders_included() {
        let config = settings().resolve().unwrap();
        let roster = build_roster(
            vec![
                member("1", &["TARGET"], None),
                member("2", &["PRIORITY"], None),
                member("3", &[], None),
                member("4", &["R2", "TARGET"], None),
            ],
            &[],
            &config,
        );

        assert_eq!(ids(&roster), vec!["1", "4"]);
    }

    #[test]
    fn test_priority_partition_beats_join_time() {
        let config = settings().resolve().unwrap();
        let roster = build_roster(
            vec![
                member("early", &["TARGET"], Some("2020-01-01T00:00:00+00:00")),
                member("late-priority", &["TARGET", "PRIORITY"], Some("2025-01-01T00:00:00+00:00")),
                member("mid-priority", &["PRIORITY", "TARGET"], Some("2023-01-01T00:00:00+00:00")),
            ],
            &[],
            &config,
        );

        assert_eq!(ids(&roster), vec!["mid-priority", "late-priority", "early"]);
    }

    #[test]
    fn test_missing_join_time_sorts_first() {
        let config = settings().resolve().unwrap();
        let roster = build_roster(
            vec![
                member("dated", &["TARGET"], Some("2021-03-04T05:06:07.000000+00:00")),
                member("undated", &["TARGET"], None),
                member("older", &["TARGET"], Some("2019-01-01T00:00:00+00:00")),
                member("undated-priority", &["TARGET", "PRIORITY"], None),
                member("dated-priority", &["TARGET", "PRIORITY"], Some("2018-01-01T00:00:00+00:00")),
            ],
            &[],
            &config,
        );

        assert_eq!(
            ids(&roster),
            vec!["undated-priority", "dated-priority", "undated", "older", "dated"]
        );
    }

    #[test]
    fn test_everyone_never_listed() {
        let config = settings().resolve().unwrap();
        let roster = build_roster(
            vec![
                member("1", &["EVERYONE", "TARGET"], None),
                member("2", &["TARGET", "EVERYONE", "R2"], None),
            ],
            &[
                role("EVERYONE", "@everyone", Some(0)),
                role("TARGET", "Member", Some(255)),
                role("R2", "Core", None),
            ],
            &config,
        );

        for view in &roster {
            assert!(view.roles.iter().all(|r| r.name != "@everyone"));
        }
        assert_eq!(
            roster[1].roles.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["Member", "Core"]
        );
        assert_eq!(roster[0].roles[0].color.as_deref(), Some("#0000ff"));
    }
}
