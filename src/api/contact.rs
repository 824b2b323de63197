//! Contact message API endpoints.

use axum::{
    extract::{Path, State},
    Extension,
};

use super::{ApiResponse, ApiResult, AppJson, AppQuery, Empty, ListQuery};
use crate::auth::CurrentUser;
use crate::models::{Contact, ContactStatus, CreateContactRequest, UpdateContactRequest};
use crate::AppState;

/// GET /api/contact and /api/contact/public
pub async fn list_contacts(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> ApiResult<Vec<Contact>> {
    let status = query.status().map(ContactStatus::parse_field).transpose()?;
    let priority = query.priority()?;
    let page_request = query.page_request();

    let page = state.repo.list_contacts(status, priority, page_request).await?;
    Ok(ApiResponse::paged(page, page_request))
}

/// GET /api/contact/:id
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Contact> {
    Ok(ApiResponse::new(state.repo.get_contact(&id).await?))
}

/// POST /api/contact - Public submission.
pub async fn create_contact(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateContactRequest>,
) -> ApiResult<Contact> {
    let contact = state.repo.create_contact(&request).await?;
    Ok(ApiResponse::created(contact))
}

/// PUT /api/contact/:id - Status changes follow the contact lifecycle.
pub async fn update_contact(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    AppJson(update): AppJson<UpdateContactRequest>,
) -> ApiResult<Contact> {
    let contact = state.repo.update_contact(&id, &update, &user.id).await?;
    Ok(ApiResponse::new(contact))
}

/// PUT /api/contact/:id/read
pub async fn mark_contact_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Contact> {
    let contact = state.repo.mark_contact_read(&id).await?;
    Ok(ApiResponse::new(contact))
}

/// DELETE /api/contact/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Empty> {
    state.repo.delete_contact(&id).await?;
    Ok(ApiResponse::new(Empty {}))
}

/// GET /api/contact/new - Unread messages, oldest first.
pub async fn new_contacts(State(state): State<AppState>) -> ApiResult<Vec<Contact>> {
    Ok(ApiResponse::with_count(state.repo.new_contacts().await?))
}

/// GET /api/contact/status/:status
pub async fn contacts_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<Vec<Contact>> {
    let status = ContactStatus::parse_field(status.trim())?;
    Ok(ApiResponse::with_count(
        state.repo.contacts_by_status(status).await?,
    ))
}
