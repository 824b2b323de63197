//! Member API endpoints.

use axum::extract::{Path, State};

use super::{ApiResponse, ApiResult, AppJson, Empty};
use crate::models::{Member, MemberRequest};
use crate::AppState;

fn linked(state: &AppState, member: Member) -> Member {
    member.with_profile_link(state.config.frontend_url.as_deref())
}

/// GET /api/members - List active members.
pub async fn list_members(State(state): State<AppState>) -> ApiResult<Vec<Member>> {
    let members = state
        .repo
        .list_active_members()
        .await?
        .into_iter()
        .map(|m| linked(&state, m))
        .collect();

    Ok(ApiResponse::with_count(members))
}

/// GET /api/members/:id - Get a single member.
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Member> {
    let member = state.repo.get_member(&id).await?;
    Ok(ApiResponse::new(linked(&state, member)))
}

/// POST /api/members - Create a new member.
pub async fn create_member(
    State(state): State<AppState>,
    AppJson(request): AppJson<MemberRequest>,
) -> ApiResult<Member> {
    let member = state.repo.create_member(&request).await?;
    Ok(ApiResponse::created(linked(&state, member)))
}

/// PUT /api/members/:id - Update a member.
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<MemberRequest>,
) -> ApiResult<Member> {
    let member = state.repo.update_member(&id, &request).await?;
    Ok(ApiResponse::new(linked(&state, member)))
}

/// DELETE /api/members/:id - Delete a member.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Empty> {
    state.repo.delete_member(&id).await?;
    Ok(ApiResponse::new(Empty {}))
}
