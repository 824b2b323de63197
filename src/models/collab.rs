//! Collaboration request model and its status transitions.

use serde::{Deserialize, Serialize};

use super::{Priority, ResponseRecord};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CollabStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    InProgress,
}

impl CollabStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollabStatus::Pending => "pending",
            CollabStatus::Approved => "approved",
            CollabStatus::Rejected => "rejected",
            CollabStatus::InProgress => "in-progress",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CollabStatus::Pending),
            "approved" => Some(CollabStatus::Approved),
            "rejected" => Some(CollabStatus::Rejected),
            "in-progress" => Some(CollabStatus::InProgress),
            _ => None,
        }
    }

    pub fn parse_field(s: &str) -> Result<Self, AppError> {
        Self::parse(s).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid status '{}': expected one of pending, approved, rejected, in-progress",
                s
            ))
        })
    }
}

/// A request from a visitor who wants to collaborate on a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollabRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub skill: String,
    pub project_idea: String,
    pub message: String,
    pub status: CollabStatus,
    pub priority: Priority,
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseRecord>,
    /// Derived on read
    #[serde(default)]
    pub age_in_days: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl CollabRequest {
    /// Move to `status`. When a non-blank message accompanies the change, the response is
    /// recorded in the same step.
    pub fn update_status(
        &mut self,
        status: CollabStatus,
        message: Option<&str>,
        actor_id: &str,
        now: &str,
    ) {
        self.status = status;
        if let Some(message) = message.map(str::trim).filter(|m| !m.is_empty()) {
            self.response = Some(ResponseRecord {
                message: message.to_string(),
                responded_by: actor_id.to_string(),
                responded_at: now.to_string(),
            });
        }
    }
}

/// Request body for `POST /api/collab`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollabRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub project_idea: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body for `PUT /api/collab/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollabRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}
