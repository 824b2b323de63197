//! REST API module.
//!
//! Handlers translate request input and the caller's identity into store calls and wrap every
//! result in the `{ success, data, count?, total?, pagination? }` envelope.

mod auth;
mod collab;
mod contact;
mod members;
mod proposal;

pub use auth::*;
pub use collab::*;
pub use contact::*;
pub use members::*;
pub use proposal::*;

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Page, PageRequest, Pagination, Priority};

/// JSON body extractor whose rejection goes through `AppError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor whose rejection goes through `AppError`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            data,
            count: None,
            total: None,
            pagination: None,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::new(data)
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn with_count(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            count: Some(count),
            ..Self::new(data)
        }
    }

    pub fn paged(page: Page<T>, request: PageRequest) -> Self {
        Self {
            count: Some(page.items.len()),
            total: Some(page.total),
            pagination: Some(Pagination::new(request, page.total)),
            ..Self::new(page.items)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Payload of endpoints that have nothing to return, serialized as `{}`.
#[derive(Debug, Serialize)]
pub struct Empty {}

/// Query string accepted by the paginated list endpoints. Everything arrives as text and is
/// coerced here.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref())
    }

    /// The status filter, if one was given. Parsing is left to the resource's own status type.
    pub fn status(&self) -> Option<&str> {
        non_blank(self.status.as_deref())
    }

    pub fn priority(&self) -> Result<Option<Priority>, AppError> {
        non_blank(self.priority.as_deref())
            .map(Priority::parse_field)
            .transpose()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::with_count(vec![1, 2])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);
        assert!(body.get("pagination").is_none());
        assert!(body.get("status").is_none());

        let body = serde_json::to_value(ApiResponse::new(Empty {})).unwrap();
        assert_eq!(body["data"], serde_json::json!({}));
    }

    #[test]
    fn test_paged_envelope() {
        let page = Page {
            items: vec!["a"; 10],
            total: 25,
        };
        let request = PageRequest::from_raw(Some("2"), Some("10"));
        let body = serde_json::to_value(ApiResponse::paged(page, request)).unwrap();
        assert_eq!(body["count"], 10);
        assert_eq!(body["total"], 25);
        assert_eq!(body["pagination"]["page"], 2);
        assert_eq!(body["pagination"]["total_pages"], 3);
    }

    #[test]
    fn test_list_query_blank_filters_are_ignored() {
        let query = ListQuery {
            status: Some("  ".into()),
            priority: Some(String::new()),
            ..Default::default()
        };
        assert!(query.status().is_none());
        assert!(query.priority().unwrap().is_none());

        let query = ListQuery {
            priority: Some("urgent".into()),
            ..Default::default()
        };
        assert!(query.priority().is_err());
    }
}
