// src/models.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::discord::{GuildMember, GuildRole};

/// Name Discord gives the implicit role every member holds
pub const EVERYONE_ROLE_NAME: &str = "@everyone";

/// Role as shown on the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleView {
    pub id: String,
    pub name: String,
    /// `#rrggbb`, or null when the role has no color
    pub color: Option<String>,
}

impl From<&GuildRole> for RoleView {
    fn from(role: &GuildRole) -> Self {
        Self {
            id: role.id.clone(),
            name: role.name.clone(),
            color: format_role_color(role.color),
        }
    }
}

/// Roster entry returned by /api/members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    pub id: String,
    pub handle: String,
    pub global_name: Option<String>,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub roles: Vec<RoleView>,
    pub joined_at: Option<String>,
}

impl MemberView {
    /// Build the view of a member, resolving role ids through `lookup`.
    ///
    /// Unknown role ids and `@everyone` are dropped; the member's role order is kept.
    pub fn from_member(member: GuildMember, lookup: &RoleLookup) -> Self {
        let roles = member
            .roles
            .iter()
            .filter_map(|id| lookup.get(id.as_str()))
            .filter(|role| role.name != EVERYONE_ROLE_NAME)
            .cloned()
            .collect();

        Self {
            handle: format!("@{}", member.user.username),
            id: member.user.id,
            global_name: member.user.global_name,
            nickname: member.nick,
            avatar: member.user.avatar,
            roles,
            joined_at: member.joined_at,
        }
    }
}

/// Role id -> view, built once per request
pub type RoleLookup = HashMap<String, RoleView>;

pub fn build_role_lookup(roles: &[GuildRole]) -> RoleLookup {
    roles
        .iter()
        .map(|role| (role.id.clone(), RoleView::from(role)))
        .collect()
}

/// Format a Discord integer color as `#rrggbb`; 0 means "no color"
pub fn format_role_color(color: Option<u32>) -> Option<String> {
    match color {
        None | Some(0) => None,
        Some(value) => Some(format!("#{:06x}", value)),
    }
}
