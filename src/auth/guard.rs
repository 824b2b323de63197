//! Access guard middleware.
//!
//! `authenticate` resolves the caller from a bearer header or the `token` cookie and attaches a
//! [`CurrentUser`] to the request. `require_admin` runs after it and checks the role.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::errors::AppError;
use crate::models::{Role, User};
use crate::AppState;

/// Name of the session cookie set on login.
pub const TOKEN_COOKIE: &str = "token";

/// The authenticated caller, available to handlers as `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

fn not_authorized() -> AppError {
    AppError::Unauthorized("Not authorized to access this route".to_string())
}

/// Authenticate the request and attach the resolved user.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers()).ok_or_else(not_authorized)?;
    let identity = state.tokens.verify(&token)?;

    // The account may have been removed since the token was issued.
    let user = state
        .repo
        .find_user_by_id(&identity.subject_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user_id = %identity.subject_id, "Token subject no longer exists");
            not_authorized()
        })?;

    // Role checks use the stored role, not the one baked into the token.
    if identity.role != user.role {
        tracing::debug!(user_id = %user.id, "Token role is stale");
    }

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Only let admins through. Must be layered inside `authenticate`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let current = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(not_authorized)?;

    authorize(&current.0, &[Role::Admin])?;
    Ok(next.run(request).await)
}

/// Exact-match role check against an allow-list.
pub fn authorize(user: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        tracing::debug!(user_id = %user.id, role = user.role.as_str(), "Role not allowed");
        Err(AppError::Forbidden(format!(
            "User role {} is not authorized to access this route",
            user.role.as_str()
        )))
    }
}

/// Bearer header first, then the session cookie. The logout placeholder value is ignored.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty() && v != "none")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user(role: Role) -> User {
        User {
            id: "u1".into(),
            name: "Guard".into(),
            email: "g@example.com".into(),
            role,
            created_at: "2024-01-01T00:00:00.000000Z".into(),
        }
    }

    #[test]
    fn test_authorize_exact_match() {
        assert!(authorize(&user(Role::Admin), &[Role::Admin]).is_ok());
        let err = authorize(&user(Role::User), &[Role::Admin]).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_extract_token_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("token=xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=xyz"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_extract_token_missing_or_cleared() {
        assert!(extract_token(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_token(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token=none"));
        assert!(extract_token(&headers).is_none());
    }
}
