//! Proposal store. One published document is current at a time.

use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{new_id, parse_json, to_json, Repository};
use crate::errors::AppError;
use crate::models::{timestamp_now, Objective, Proposal, ProposalRequest, ProposalStatus};
use crate::validation::{max_len, required};

const PROPOSAL_COLUMNS: &str = "id, title, description, objectives, is_editable, last_edited_by, version, status, created_at, updated_at";
const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 2000;
const MAX_OBJECTIVE_DESCRIPTION_LEN: usize = 500;

impl Repository {
    /// The published proposal with the highest version, if any.
    pub async fn get_current_proposal(&self) -> Result<Option<Proposal>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM proposals WHERE status = ? ORDER BY version DESC, rowid DESC LIMIT 1",
            PROPOSAL_COLUMNS
        ))
        .bind(ProposalStatus::Published.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(proposal_from_row))
    }

    pub async fn get_proposal(&self, id: &str) -> Result<Proposal, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM proposals WHERE id = ?", PROPOSAL_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(proposal_from_row)
            .ok_or_else(|| proposal_not_found(id))
    }

    /// Every stored proposal, highest version first.
    pub async fn list_proposal_versions(&self) -> Result<Vec<Proposal>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM proposals ORDER BY version DESC, created_at DESC, rowid DESC",
            PROPOSAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(proposal_from_row).collect())
    }

    /// Create the proposal at version 1 when nothing is published, otherwise apply the provided
    /// fields to the current one and bump its version.
    pub async fn upsert_current_proposal(
        &self,
        request: &ProposalRequest,
        actor_id: &str,
    ) -> Result<Proposal, AppError> {
        match self.get_current_proposal().await? {
            Some(mut proposal) => {
                apply_proposal_fields(&mut proposal, request)?;
                proposal.version += 1;
                proposal.last_edited_by = actor_id.to_string();
                proposal.updated_at = timestamp_now();

                sqlx::query(
                    "UPDATE proposals SET title = ?, description = ?, objectives = ?, is_editable = ?, last_edited_by = ?, version = ?, status = ?, updated_at = ? WHERE id = ?",
                )
                .bind(&proposal.title)
                .bind(&proposal.description)
                .bind(to_json(&proposal.objectives)?)
                .bind(proposal.is_editable as i32)
                .bind(&proposal.last_edited_by)
                .bind(proposal.version)
                .bind(proposal.status.as_str())
                .bind(&proposal.updated_at)
                .bind(&proposal.id)
                .execute(&self.pool)
                .await?;

                tracing::info!(proposal_id = %proposal.id, version = proposal.version, "Updated proposal");
                Ok(proposal)
            }
            None => {
                let now = timestamp_now();
                let mut proposal = Proposal {
                    id: new_id(),
                    title: required(request.title.as_deref(), "Please provide a title")?,
                    description: required(
                        request.description.as_deref(),
                        "Please provide a description",
                    )?,
                    objectives: Vec::new(),
                    is_editable: true,
                    last_edited_by: actor_id.to_string(),
                    version: 1,
                    status: ProposalStatus::default(),
                    created_at: now.clone(),
                    updated_at: now,
                };
                apply_proposal_fields(&mut proposal, request)?;

                sqlx::query(&format!(
                    "INSERT INTO proposals ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    PROPOSAL_COLUMNS
                ))
                .bind(&proposal.id)
                .bind(&proposal.title)
                .bind(&proposal.description)
                .bind(to_json(&proposal.objectives)?)
                .bind(proposal.is_editable as i32)
                .bind(&proposal.last_edited_by)
                .bind(proposal.version)
                .bind(proposal.status.as_str())
                .bind(&proposal.created_at)
                .bind(&proposal.updated_at)
                .execute(&self.pool)
                .await?;

                tracing::info!(proposal_id = %proposal.id, "Created proposal");
                Ok(proposal)
            }
        }
    }

    /// Flip the status to archived. The version is left alone.
    pub async fn archive_proposal(&self, id: &str) -> Result<Proposal, AppError> {
        let mut proposal = self.get_proposal(id).await?;
        proposal.status = ProposalStatus::Archived;
        proposal.updated_at = timestamp_now();

        sqlx::query("UPDATE proposals SET status = ?, updated_at = ? WHERE id = ?")
            .bind(proposal.status.as_str())
            .bind(&proposal.updated_at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(proposal_id = %id, "Archived proposal");
        Ok(proposal)
    }
}

fn apply_proposal_fields(proposal: &mut Proposal, request: &ProposalRequest) -> Result<(), AppError> {
    if let Some(title) = request.title.as_deref() {
        proposal.title = required(Some(title), "Please provide a title")?;
    }
    max_len(&proposal.title, MAX_TITLE_LEN, "Title")?;

    if let Some(description) = request.description.as_deref() {
        proposal.description = required(Some(description), "Please provide a description")?;
    }
    max_len(&proposal.description, MAX_DESCRIPTION_LEN, "Description")?;

    if let Some(objectives) = &request.objectives {
        proposal.objectives = objectives
            .iter()
            .map(validate_objective)
            .collect::<Result<_, _>>()?;
    }
    if let Some(is_editable) = request.is_editable {
        proposal.is_editable = is_editable;
    }
    if let Some(status) = request.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let status = ProposalStatus::parse_field(status)?;
        // Archiving keeps the version, so it only goes through `archive_proposal`.
        if status == ProposalStatus::Archived {
            return Err(AppError::Validation(
                "Use the archive route to archive a proposal".to_string(),
            ));
        }
        proposal.status = status;
    }
    Ok(())
}

fn validate_objective(objective: &Objective) -> Result<Objective, AppError> {
    let title = required(Some(objective.title.as_str()), "Each objective needs a title")?;
    let description = required(Some(objective.description.as_str()), "Each objective needs a description")?;
    max_len(&description, MAX_OBJECTIVE_DESCRIPTION_LEN, "Objective description")?;
    Ok(Objective { title, description })
}

fn proposal_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Proposal not found with id of {}", id))
}

fn proposal_from_row(row: &SqliteRow) -> Proposal {
    let objectives: String = row.get("objectives");
    let is_editable: i32 = row.get("is_editable");
    let status: String = row.get("status");
    Proposal {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        objectives: parse_json(&objectives),
        is_editable: is_editable != 0,
        last_edited_by: row.get("last_edited_by"),
        version: row.get("version"),
        status: ProposalStatus::parse(&status).unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        Proposal {
            id: "p1".into(),
            title: "Plan".into(),
            description: "Desc".into(),
            objectives: vec![],
            is_editable: true,
            last_edited_by: "admin".into(),
            version: 1,
            status: ProposalStatus::Published,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_apply_fields_partial() {
        let mut p = proposal();
        let request = ProposalRequest {
            description: Some("New description".into()),
            ..Default::default()
        };
        apply_proposal_fields(&mut p, &request).unwrap();
        assert_eq!(p.title, "Plan");
        assert_eq!(p.description, "New description");
        assert_eq!(p.status, ProposalStatus::Published);
    }

    #[test]
    fn test_objective_rules() {
        let mut p = proposal();
        let request = ProposalRequest {
            objectives: Some(vec![Objective {
                title: "Goal".into(),
                description: String::new(),
            }]),
            ..Default::default()
        };
        assert!(apply_proposal_fields(&mut p, &request).is_err());

        let request = ProposalRequest {
            objectives: Some(vec![Objective {
                title: "Goal".into(),
                description: "x".repeat(MAX_OBJECTIVE_DESCRIPTION_LEN + 1),
            }]),
            ..Default::default()
        };
        assert!(apply_proposal_fields(&mut p, &request).is_err());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut p = proposal();
        let request = ProposalRequest {
            status: Some("live".into()),
            ..Default::default()
        };
        assert!(matches!(
            apply_proposal_fields(&mut p, &request),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_archived_status_rejected_on_update() {
        let mut p = proposal();
        let request = ProposalRequest {
            title: Some("Renamed".into()),
            status: Some("archived".into()),
            ..Default::default()
        };
        assert!(matches!(
            apply_proposal_fields(&mut p, &request),
            Err(AppError::Validation(_))
        ));
        assert_eq!(p.status, ProposalStatus::Published);
        assert_eq!(p.version, 1);
    }

    #[test]
    fn test_title_too_long() {
        let mut p = proposal();
        let request = ProposalRequest {
            title: Some("t".repeat(MAX_TITLE_LEN + 1)),
            ..Default::default()
        };
        assert!(apply_proposal_fields(&mut p, &request).is_err());
    }
}
