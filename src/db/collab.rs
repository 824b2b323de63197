//! Collaboration request store.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{new_id, ListFilter, Repository, SortOrder};
use crate::errors::AppError;
use crate::models::{
    age_in_days, timestamp_now, CollabRequest, CollabStatus, CreateCollabRequest, Page,
    PageRequest, Priority, ResponseRecord, UpdateCollabRequest,
};
use crate::validation::{max_len, normalize_email, optional, required, validate_email};

const TABLE: &str = "collab_requests";
const COLLAB_COLUMNS: &str = "id, name, email, phone, skill, project_idea, message, status, priority, assigned_to, response_message, responded_by, responded_at, created_at, updated_at";

impl Repository {
    pub async fn create_collab_request(
        &self,
        request: &CreateCollabRequest,
    ) -> Result<CollabRequest, AppError> {
        let name = required(request.name.as_deref(), "Please provide your name")?;
        max_len(&name, 100, "Name")?;
        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        validate_email(&email)?;
        let skill = required(request.skill.as_deref(), "Please specify your skill")?;
        max_len(&skill, 100, "Skill")?;
        let project_idea = required(
            request.project_idea.as_deref(),
            "Please describe your project idea",
        )?;
        max_len(&project_idea, 500, "Project idea")?;
        let message = required(request.message.as_deref(), "Please provide a message")?;
        max_len(&message, 1000, "Message")?;

        let now = timestamp_now();
        let collab = CollabRequest {
            id: new_id(),
            name,
            email,
            phone: optional(request.phone.as_deref()),
            skill,
            project_idea,
            message,
            status: CollabStatus::default(),
            priority: Priority::default(),
            assigned_to: None,
            response: None,
            age_in_days: 0,
            created_at: now.clone(),
            updated_at: now,
        };

        sqlx::query(&format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, NULL, NULL, NULL, ?, ?)",
            TABLE, COLLAB_COLUMNS
        ))
        .bind(&collab.id)
        .bind(&collab.name)
        .bind(&collab.email)
        .bind(&collab.phone)
        .bind(&collab.skill)
        .bind(&collab.project_idea)
        .bind(&collab.message)
        .bind(collab.status.as_str())
        .bind(collab.priority.as_str())
        .bind(&collab.created_at)
        .bind(&collab.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(collab_id = %collab.id, "Collaboration request submitted");
        Ok(collab)
    }

    pub async fn get_collab_request(&self, id: &str) -> Result<CollabRequest, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM {} WHERE id = ?", COLLAB_COLUMNS, TABLE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(collab_from_row)
            .ok_or_else(|| collab_not_found(id))
    }

    pub async fn list_collab_requests(
        &self,
        status: Option<CollabStatus>,
        priority: Option<Priority>,
        page: PageRequest,
    ) -> Result<Page<CollabRequest>, AppError> {
        let filter = ListFilter {
            status: status.map(|s| s.as_str()),
            priority,
        };
        self.fetch_page(TABLE, COLLAB_COLUMNS, &filter, page, collab_from_row)
            .await
    }

    /// Pending requests in arrival order.
    pub async fn pending_collab_requests(&self) -> Result<Vec<CollabRequest>, AppError> {
        let filter = ListFilter {
            status: Some(CollabStatus::Pending.as_str()),
            priority: None,
        };
        self.fetch_all_sorted(TABLE, COLLAB_COLUMNS, &filter, SortOrder::OldestFirst, collab_from_row)
            .await
    }

    pub async fn collab_requests_by_status(
        &self,
        status: CollabStatus,
    ) -> Result<Vec<CollabRequest>, AppError> {
        let filter = ListFilter {
            status: Some(status.as_str()),
            priority: None,
        };
        self.fetch_all_sorted(TABLE, COLLAB_COLUMNS, &filter, SortOrder::NewestFirst, collab_from_row)
            .await
    }

    /// Apply an admin update. Every field is validated before anything is written.
    pub async fn update_collab_request(
        &self,
        id: &str,
        update: &UpdateCollabRequest,
        actor_id: &str,
    ) -> Result<CollabRequest, AppError> {
        let mut collab = self.get_collab_request(id).await?;
        let now = timestamp_now();

        let priority = optional(update.priority.as_deref())
            .map(|p| Priority::parse_field(&p))
            .transpose()?;
        // A response is only recorded together with a status change.
        if let Some(status) = optional(update.status.as_deref()) {
            let status = CollabStatus::parse_field(&status)?;
            collab.update_status(status, update.message.as_deref(), actor_id, &now);
        }
        if let Some(priority) = priority {
            collab.priority = priority;
        }
        if let Some(assignee) = optional(update.assigned_to.as_deref()) {
            collab.assigned_to = Some(assignee);
        }
        collab.updated_at = now;

        let response = collab.response.as_ref();
        sqlx::query(&format!(
            "UPDATE {} SET status = ?, priority = ?, assigned_to = ?, response_message = ?, responded_by = ?, responded_at = ?, updated_at = ? WHERE id = ?",
            TABLE
        ))
        .bind(collab.status.as_str())
        .bind(collab.priority.as_str())
        .bind(&collab.assigned_to)
        .bind(response.map(|r| r.message.as_str()))
        .bind(response.map(|r| r.responded_by.as_str()))
        .bind(response.map(|r| r.responded_at.as_str()))
        .bind(&collab.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::info!(collab_id = %id, status = collab.status.as_str(), "Collaboration request updated");
        Ok(collab)
    }

    pub async fn delete_collab_request(&self, id: &str) -> Result<(), AppError> {
        self.delete_by_id(TABLE, id, "Collaboration request").await
    }
}

fn collab_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Collaboration request not found with id of {}", id))
}

pub(super) fn response_from_row(row: &SqliteRow) -> Option<ResponseRecord> {
    let message: Option<String> = row.get("response_message");
    message.map(|message| ResponseRecord {
        message,
        responded_by: row.get::<Option<String>, _>("responded_by").unwrap_or_default(),
        responded_at: row.get::<Option<String>, _>("responded_at").unwrap_or_default(),
    })
}

fn collab_from_row(row: &SqliteRow) -> CollabRequest {
    let status: String = row.get("status");
    let priority: String = row.get("priority");
    let created_at: String = row.get("created_at");
    CollabRequest {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        skill: row.get("skill"),
        project_idea: row.get("project_idea"),
        message: row.get("message"),
        status: CollabStatus::parse(&status).unwrap_or_default(),
        priority: Priority::parse(&priority).unwrap_or_default(),
        assigned_to: row.get("assigned_to"),
        response: response_from_row(row),
        age_in_days: age_in_days(&created_at, Utc::now()),
        created_at,
        updated_at: row.get("updated_at"),
    }
}
