//! Proposal API endpoints.

use axum::{
    extract::{Path, State},
    Extension,
};

use super::{ApiResponse, ApiResult, AppJson};
use crate::auth::CurrentUser;
use crate::models::{fallback_proposal, CurrentProposal, Proposal, ProposalRequest};
use crate::AppState;

/// GET /api/proposal - The current published proposal, or the built-in default.
pub async fn get_proposal(State(state): State<AppState>) -> ApiResult<CurrentProposal> {
    let current = match state.repo.get_current_proposal().await? {
        Some(proposal) => CurrentProposal::Stored(proposal),
        None => CurrentProposal::Fallback(fallback_proposal()),
    };
    Ok(ApiResponse::new(current))
}

/// PUT /api/proposal - Create the proposal on first use, otherwise edit the current one.
pub async fn update_proposal(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(request): AppJson<ProposalRequest>,
) -> ApiResult<Proposal> {
    let proposal = state.repo.upsert_current_proposal(&request, &user.id).await?;
    Ok(ApiResponse::new(proposal))
}

/// GET /api/proposal/versions
pub async fn list_proposal_versions(State(state): State<AppState>) -> ApiResult<Vec<Proposal>> {
    let versions = state.repo.list_proposal_versions().await?;
    Ok(ApiResponse::with_count(versions))
}

/// PUT /api/proposal/:id/archive
pub async fn archive_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Proposal> {
    let proposal = state.repo.archive_proposal(&id).await?;
    Ok(ApiResponse::new(proposal))
}
