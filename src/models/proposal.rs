//! Project proposal model.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Published => "published",
            ProposalStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ProposalStatus::Draft),
            "published" => Some(ProposalStatus::Published),
            "archived" => Some(ProposalStatus::Archived),
            _ => None,
        }
    }

    pub fn parse_field(s: &str) -> Result<Self, AppError> {
        Self::parse(s).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid proposal status '{}': expected draft, published or archived",
                s
            ))
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Objective {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A stored proposal document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub objectives: Vec<Objective>,
    pub is_editable: bool,
    /// User id of the admin behind the latest write
    pub last_edited_by: String,
    pub version: i64,
    pub status: ProposalStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for `PUT /api/proposal`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub objectives: Option<Vec<Objective>>,
    #[serde(default)]
    pub is_editable: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Payload served when no proposal has been published yet.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackProposal {
    pub title: &'static str,
    pub description: &'static str,
    pub objectives: Vec<FallbackObjective>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FallbackObjective {
    pub title: &'static str,
    pub description: &'static str,
}

/// What `GET /api/proposal` returns.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CurrentProposal {
    Stored(Proposal),
    Fallback(FallbackProposal),
}

pub fn fallback_proposal() -> FallbackProposal {
    let objective = |title, description| FallbackObjective { title, description };

    FallbackProposal {
        title: "SkillSync Hub",
        description: "Collaborative Talent & Portfolio Sharing Platform",
        objectives: vec![
            objective(
                "Connect students via skill sharing",
                "Create a platform where students can share their skills and collaborate on projects",
            ),
            objective(
                "Mini portfolio for each user",
                "Provide users with a personal space to showcase their skills and achievements",
            ),
            objective(
                "Collaboration request",
                "Enable users to request collaboration based on their skills and project needs",
            ),
            objective(
                "Skill-based search",
                "Allow users to find collaborators based on specific skills and expertise",
            ),
            objective(
                "Messaging/Contact",
                "Provide communication tools for seamless collaboration between users",
            ),
        ],
    }
}
