//! Configuration module for the SkillSync backend.
//!
//! All configuration is loaded from environment variables with sensible defaults. The resulting
//! `Config` is built once at startup and handed to the services that need it.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Signing secret used when none is configured. Only suitable for local development.
pub const DEV_JWT_SECRET: &str = "change_this_secret";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    /// Whether `jwt_secret` came from the environment
    pub jwt_secret_configured: bool,
    /// Session token lifetime in seconds
    pub jwt_expiry_secs: i64,
    /// Public frontend base URL, used to derive member profile links
    pub frontend_url: Option<String>,
    /// Admin account ensured at startup
    pub admin: Option<AdminBootstrap>,
}

/// Credentials of the admin account created on first start.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("SKILLSYNC_DB_PATH")
            .unwrap_or_else(|_| "./data/skillsync.sqlite".to_string())
            .into();

        let bind_addr = env::var("SKILLSYNC_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid SKILLSYNC_BIND_ADDR: {}", e)))?;

        let log_level = env::var("SKILLSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let configured_secret = env::var("SKILLSYNC_JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let jwt_secret_configured = configured_secret.is_some();
        let jwt_secret = configured_secret.unwrap_or_else(|| DEV_JWT_SECRET.to_string());

        let jwt_expiry_secs = parse_expiry(
            &env::var("SKILLSYNC_JWT_EXPIRE").unwrap_or_else(|_| "7d".to_string()),
        )?;

        let frontend_url = env::var("SKILLSYNC_FRONTEND_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let admin = match (
            env::var("SKILLSYNC_ADMIN_EMAIL").ok(),
            env::var("SKILLSYNC_ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) => Some(AdminBootstrap {
                name: env::var("SKILLSYNC_ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            jwt_secret,
            jwt_secret_configured,
            jwt_expiry_secs,
            frontend_url,
            admin,
        })
    }
}

/// Longest session lifetime accepted from the environment: one year.
const MAX_EXPIRY_SECS: i64 = 365 * 86_400;

/// Parse a token lifetime such as `7d`, `12h`, `30m`, `45s` or a bare number of seconds.
pub fn parse_expiry(raw: &str) -> Result<i64, AppError> {
    let raw = raw.trim();
    let invalid = || AppError::Internal(format!("Invalid SKILLSYNC_JWT_EXPIRE value: {:?}", raw));

    let (digits, multiplier) = match raw.char_indices().last() {
        Some((idx, 'd')) => (&raw[..idx], 86_400),
        Some((idx, 'h')) => (&raw[..idx], 3_600),
        Some((idx, 'm')) => (&raw[..idx], 60),
        Some((idx, 's')) => (&raw[..idx], 1),
        Some(_) => (raw, 1),
        None => return Err(invalid()),
    };

    let value: i64 = digits.parse().map_err(|_| invalid())?;
    if value <= 0 {
        return Err(invalid());
    }
    value
        .checked_mul(multiplier)
        .filter(|secs| *secs <= MAX_EXPIRY_SECS)
        .ok_or_else(invalid)
}
