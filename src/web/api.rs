//! JSON API consumed by the site page

use axum::{extract::State, Json};

use super::server::AppState;
use crate::error::RosterError;
use crate::models::MemberView;

/// GET /api/members - ordered roster of the configured guild
pub async fn list_members(
    State(state): State<AppState>,
) -> Result<Json<Vec<MemberView>>, RosterError> {
    let roster = state.roster.get_roster().await?;
    Ok(Json(roster))
}
