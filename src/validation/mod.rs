//! Input validation utilities.
//!
//! Every check returns `AppError::Validation` with a message that can be shown to the client.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?-u:\w)+([.-]?(?-u:\w)+)*@(?-u:\w)+([.-]?(?-u:\w)+)*(\.(?-u:\w){2,3})+$").expect("email regex is valid")
});

pub const MIN_PASSWORD_LEN: usize = 6;

/// Trim and ASCII-lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Validate an already normalized email address.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        return Err(AppError::Validation("Please provide an email".to_string()));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(AppError::Validation(
            "Please fill a valid email address".to_string(),
        ));
    }

    Ok(())
}

/// A present, non-blank value, trimmed.
pub fn required(value: Option<&str>, message: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

/// Reject values longer than `max` characters.
pub fn max_len(value: &str, max: usize, field: &str) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} cannot exceed {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Trim an optional free-text value, mapping blanks to `None`.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::Validation("Please provide a password".to_string()));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    Ok(())
}
