//! Collaboration request API endpoints.

use axum::{
    extract::{Path, State},
    Extension,
};

use super::{ApiResponse, ApiResult, AppJson, AppQuery, Empty, ListQuery};
use crate::auth::CurrentUser;
use crate::models::{CollabRequest, CollabStatus, CreateCollabRequest, UpdateCollabRequest};
use crate::AppState;

/// GET /api/collab and /api/collab/public - Paginated, filterable listing.
pub async fn list_collab_requests(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> ApiResult<Vec<CollabRequest>> {
    let status = query.status().map(CollabStatus::parse_field).transpose()?;
    let priority = query.priority()?;
    let page_request = query.page_request();

    let page = state
        .repo
        .list_collab_requests(status, priority, page_request)
        .await?;
    Ok(ApiResponse::paged(page, page_request))
}

/// GET /api/collab/:id
pub async fn get_collab_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CollabRequest> {
    let collab = state.repo.get_collab_request(&id).await?;
    Ok(ApiResponse::new(collab))
}

/// POST /api/collab - Public submission.
pub async fn create_collab_request(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateCollabRequest>,
) -> ApiResult<CollabRequest> {
    let collab = state.repo.create_collab_request(&request).await?;
    Ok(ApiResponse::created(collab))
}

/// PUT /api/collab/:id
pub async fn update_collab_request(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    AppJson(update): AppJson<UpdateCollabRequest>,
) -> ApiResult<CollabRequest> {
    let collab = state
        .repo
        .update_collab_request(&id, &update, &user.id)
        .await?;
    Ok(ApiResponse::new(collab))
}

/// DELETE /api/collab/:id
pub async fn delete_collab_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Empty> {
    state.repo.delete_collab_request(&id).await?;
    Ok(ApiResponse::new(Empty {}))
}

/// GET /api/collab/pending - Oldest first.
pub async fn pending_collab_requests(
    State(state): State<AppState>,
) -> ApiResult<Vec<CollabRequest>> {
    let pending = state.repo.pending_collab_requests().await?;
    Ok(ApiResponse::with_count(pending))
}

/// GET /api/collab/status/:status
pub async fn collab_requests_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<Vec<CollabRequest>> {
    let status = CollabStatus::parse_field(status.trim())?;
    let requests = state.repo.collab_requests_by_status(status).await?;
    Ok(ApiResponse::with_count(requests))
}
