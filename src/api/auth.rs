//! Account endpoints: register, login, session and profile maintenance.

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;

use super::{ApiResponse, ApiResult, AppJson, Empty};
use crate::auth::{verify_password, CurrentUser, TOKEN_COOKIE};
use crate::errors::AppError;
use crate::models::{
    LoginRequest, RegisterRequest, Role, UpdateDetailsRequest, UpdatePasswordRequest, User,
    UserSummary,
};
use crate::validation::normalize_email;
use crate::AppState;

/// Body returned whenever a fresh token is issued.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

type TokenReply = (StatusCode, CookieJar, Json<TokenResponse>);

fn token_reply(
    status: StatusCode,
    jar: CookieJar,
    token: String,
    user: Option<&User>,
) -> TokenReply {
    let cookie = Cookie::build((TOKEN_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .build();

    (
        status,
        jar.add(cookie),
        Json(TokenResponse {
            success: true,
            token,
            user: user.map(UserSummary::from),
        }),
    )
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<TokenReply, AppError> {
    let (Some(name), Some(email), Some(password)) = (
        request.name.as_deref().filter(|v| !v.trim().is_empty()),
        request.email.as_deref().filter(|v| !v.trim().is_empty()),
        request.password.as_deref().filter(|v| !v.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Name, email and password are required".to_string(),
        ));
    };

    let role = match request.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(role) => Role::parse_field(role)?,
        None => Role::User,
    };

    let user = state.repo.register_user(name, email, password, role).await?;
    let token = state.tokens.issue(&user)?;

    Ok(token_reply(StatusCode::CREATED, jar, token, Some(&user)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<TokenReply, AppError> {
    let email = normalize_email(request.email.as_deref().unwrap_or_default());
    let password = request.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Please provide an email and password".to_string(),
        ));
    }

    let credentials = state
        .repo
        .find_user_by_email_with_secret(&email)
        .await?
        .filter(|c| verify_password(c, &password))
        .ok_or_else(|| {
            tracing::debug!("Login rejected");
            AppError::Auth("Invalid credentials".to_string())
        })?;

    let token = state.tokens.issue(&credentials.user)?;
    tracing::info!(user_id = %credentials.user.id, "User logged in");

    Ok(token_reply(StatusCode::OK, jar, token, Some(&credentials.user)))
}

/// GET /api/auth/me
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<User> {
    Ok(ApiResponse::new(user))
}

/// GET /api/auth/logout - Clear the session cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, ApiResponse<Empty>) {
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    (jar, ApiResponse::new(Empty {}))
}

/// PUT /api/auth/updatedetails
pub async fn update_details(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(request): AppJson<UpdateDetailsRequest>,
) -> ApiResult<User> {
    let updated = state
        .repo
        .update_user_profile(&user.id, request.name.as_deref(), request.email.as_deref())
        .await?;
    Ok(ApiResponse::new(updated))
}

/// PUT /api/auth/updatepassword - Responds with a fresh token.
pub async fn update_password(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
    AppJson(request): AppJson<UpdatePasswordRequest>,
) -> Result<TokenReply, AppError> {
    let (Some(current), Some(new)) = (
        request.current_password.as_deref().filter(|v| !v.is_empty()),
        request.new_password.as_deref().filter(|v| !v.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Please provide current password and new password".to_string(),
        ));
    };

    let user = state.repo.change_user_password(&user.id, current, new).await?;
    let token = state.tokens.issue(&user)?;

    Ok(token_reply(StatusCode::OK, jar, token, None))
}
