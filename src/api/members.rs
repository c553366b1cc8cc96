//! Member API endpoints.

use axum::extract::{Path, State};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{MemberCard, MemberRecord};
use crate::AppState;

/// GET /api/members - List all members in submission order.
pub async fn list_members(State(state): State<AppState>) -> ApiResult<Vec<MemberRecord>> {
    let members = state.pipeline.members().list().await;
    let revision_id = members.len() as i64;
    success(members, revision_id)
}

/// GET /api/members/cards - Card view of all members.
pub async fn list_member_cards(State(state): State<AppState>) -> ApiResult<Vec<MemberCard>> {
    let cards = state.pipeline.members().cards().await;
    let revision_id = cards.len() as i64;
    success(cards, revision_id)
}

/// GET /api/members/:id - Get a single member.
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MemberRecord> {
    let revision_id = state.revision_id().await;

    match state.pipeline.members().get(&id).await {
        Some(member) => success(member, revision_id),
        None => error(
            AppError::NotFound(format!("Member {} not found", id)),
            revision_id,
        ),
    }
}
