//! Data models for the SkillSync Hub backend.
//!
//! JSON field names are camelCase to match what the frontend already consumes.

mod collab;
mod contact;
mod member;
mod pagination;
mod proposal;
mod user;

pub use collab::*;
pub use contact::*;
pub use member::*;
pub use pagination::*;
pub use proposal::*;
pub use user::*;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Triage priority shared by collaboration requests and contact messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Parse a client-supplied value, rejecting anything outside the allowed set.
    pub fn parse_field(s: &str) -> Result<Self, AppError> {
        Self::parse(s).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid priority '{}': expected one of low, medium, high",
                s
            ))
        })
    }
}

/// An admin's reply attached to a collaboration request or contact message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub message: String,
    /// User id of the admin who responded
    pub responded_by: String,
    pub responded_at: String,
}

/// Current time in the fixed-width RFC 3339 form used for every stored timestamp.
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Whole days elapsed since `created_at`, rounded up. Unparseable timestamps count as zero.
pub fn age_in_days(created_at: &str, now: DateTime<Utc>) -> i64 {
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    let Ok(created) = DateTime::parse_from_rfc3339(created_at) else {
        return 0;
    };
    let elapsed_ms = (now - created.with_timezone(&Utc)).num_milliseconds().abs();
    (elapsed_ms + DAY_MS - 1) / DAY_MS
}
