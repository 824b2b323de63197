//! Contact message store.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};

use super::collab::response_from_row;
use super::repository::{new_id, ListFilter, Repository, SortOrder};
use crate::errors::AppError;
use crate::models::{
    age_in_days, timestamp_now, Contact, ContactStatus, CreateContactRequest, Page, PageRequest,
    Priority, UpdateContactRequest,
};
use crate::validation::{max_len, normalize_email, optional, required, validate_email};

const TABLE: &str = "contacts";
const CONTACT_COLUMNS: &str = "id, name, email, phone, subject, message, status, priority, assigned_to, response_message, responded_by, responded_at, created_at, updated_at";

impl Repository {
    pub async fn create_contact(&self, request: &CreateContactRequest) -> Result<Contact, AppError> {
        let name = required(request.name.as_deref(), "Please provide your name")?;
        max_len(&name, 100, "Name")?;
        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        validate_email(&email)?;
        let subject = required(request.subject.as_deref(), "Please provide a subject")?;
        max_len(&subject, 200, "Subject")?;
        let message = required(request.message.as_deref(), "Please provide a message")?;
        max_len(&message, 2000, "Message")?;

        let now = timestamp_now();
        let contact = Contact {
            id: new_id(),
            name,
            email,
            phone: optional(request.phone.as_deref()),
            subject,
            message,
            status: ContactStatus::default(),
            priority: Priority::default(),
            assigned_to: None,
            response: None,
            age_in_days: 0,
            created_at: now.clone(),
            updated_at: now,
        };

        sqlx::query(&format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL, NULL, NULL, NULL, ?, ?)",
            TABLE, CONTACT_COLUMNS
        ))
        .bind(&contact.id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.subject)
        .bind(&contact.message)
        .bind(contact.status.as_str())
        .bind(contact.priority.as_str())
        .bind(&contact.created_at)
        .bind(&contact.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(contact_id = %contact.id, "Contact message received");
        Ok(contact)
    }

    pub async fn get_contact(&self, id: &str) -> Result<Contact, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM {} WHERE id = ?", CONTACT_COLUMNS, TABLE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(contact_from_row)
            .ok_or_else(|| contact_not_found(id))
    }

    pub async fn list_contacts(
        &self,
        status: Option<ContactStatus>,
        priority: Option<Priority>,
        page: PageRequest,
    ) -> Result<Page<Contact>, AppError> {
        let filter = ListFilter {
            status: status.map(|s| s.as_str()),
            priority,
        };
        self.fetch_page(TABLE, CONTACT_COLUMNS, &filter, page, contact_from_row)
            .await
    }

    /// Unread messages in arrival order.
    pub async fn new_contacts(&self) -> Result<Vec<Contact>, AppError> {
        let filter = ListFilter {
            status: Some(ContactStatus::New.as_str()),
            priority: None,
        };
        self.fetch_all_sorted(TABLE, CONTACT_COLUMNS, &filter, SortOrder::OldestFirst, contact_from_row)
            .await
    }

    pub async fn contacts_by_status(&self, status: ContactStatus) -> Result<Vec<Contact>, AppError> {
        let filter = ListFilter {
            status: Some(status.as_str()),
            priority: None,
        };
        self.fetch_all_sorted(TABLE, CONTACT_COLUMNS, &filter, SortOrder::NewestFirst, contact_from_row)
            .await
    }

    pub async fn mark_contact_read(&self, id: &str) -> Result<Contact, AppError> {
        let mut contact = self.get_contact(id).await?;
        contact.mark_as_read()?;
        contact.updated_at = timestamp_now();
        self.save_contact_state(&contact).await?;

        tracing::info!(contact_id = %id, "Contact message marked as read");
        Ok(contact)
    }

    /// Apply an admin update. A rejected transition leaves the stored message untouched.
    pub async fn update_contact(
        &self,
        id: &str,
        update: &UpdateContactRequest,
        actor_id: &str,
    ) -> Result<Contact, AppError> {
        let mut contact = self.get_contact(id).await?;
        let now = timestamp_now();

        let priority = optional(update.priority.as_deref())
            .map(|p| Priority::parse_field(&p))
            .transpose()?;
        if let Some(status) = optional(update.status.as_deref()) {
            let status = ContactStatus::parse_field(&status)?;
            contact.apply_status(status, update.message.as_deref(), actor_id, &now)?;
        }
        if let Some(priority) = priority {
            contact.priority = priority;
        }
        if let Some(assignee) = optional(update.assigned_to.as_deref()) {
            contact.assigned_to = Some(assignee);
        }
        contact.updated_at = now;
        self.save_contact_state(&contact).await?;

        tracing::info!(contact_id = %id, status = contact.status.as_str(), "Contact message updated");
        Ok(contact)
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), AppError> {
        self.delete_by_id(TABLE, id, "Contact message").await
    }

    async fn save_contact_state(&self, contact: &Contact) -> Result<(), AppError> {
        let response = contact.response.as_ref();
        sqlx::query(&format!(
            "UPDATE {} SET status = ?, priority = ?, assigned_to = ?, response_message = ?, responded_by = ?, responded_at = ?, updated_at = ? WHERE id = ?",
            TABLE
        ))
        .bind(contact.status.as_str())
        .bind(contact.priority.as_str())
        .bind(&contact.assigned_to)
        .bind(response.map(|r| r.message.as_str()))
        .bind(response.map(|r| r.responded_by.as_str()))
        .bind(response.map(|r| r.responded_at.as_str()))
        .bind(&contact.updated_at)
        .bind(&contact.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn contact_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Contact message not found with id of {}", id))
}

fn contact_from_row(row: &SqliteRow) -> Contact {
    let status: String = row.get("status");
    let priority: String = row.get("priority");
    let created_at: String = row.get("created_at");
    Contact {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        subject: row.get("subject"),
        message: row.get("message"),
        status: ContactStatus::parse(&status).unwrap_or_default(),
        priority: Priority::parse(&priority).unwrap_or_default(),
        assigned_to: row.get("assigned_to"),
        response: response_from_row(row),
        age_in_days: age_in_days(&created_at, Utc::now()),
        created_at,
        updated_at: row.get("updated_at"),
    }
}
