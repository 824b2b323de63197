//! Contact message model and its forward-only status machine.
//!
//! ```text
//! new ──► read ──► responded
//!  └──────────────► responded
//! any ────────────► closed
//! ```

use serde::{Deserialize, Serialize};

use super::{Priority, ResponseRecord};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Responded,
    Closed,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Responded => "responded",
            ContactStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(ContactStatus::New),
            "read" => Some(ContactStatus::Read),
            "responded" => Some(ContactStatus::Responded),
            "closed" => Some(ContactStatus::Closed),
            _ => None,
        }
    }

    pub fn parse_field(s: &str) -> Result<Self, AppError> {
        Self::parse(s).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid status '{}': expected one of new, read, responded, closed",
                s
            ))
        })
    }
}

/// A message sent through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
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

impl Contact {
    pub fn mark_as_read(&mut self) -> Result<(), AppError> {
        match self.status {
            ContactStatus::New | ContactStatus::Read => {
                self.status = ContactStatus::Read;
                Ok(())
            }
            from => Err(invalid_transition(from, ContactStatus::Read)),
        }
    }

    /// Record the admin's reply and move to `responded` in one step.
    pub fn add_response(&mut self, message: &str, actor_id: &str, now: &str) -> Result<(), AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation(
                "A response message is required to mark a contact message as responded"
                    .to_string(),
            ));
        }
        match self.status {
            ContactStatus::New | ContactStatus::Read => {
                self.response = Some(ResponseRecord {
                    message: message.to_string(),
                    responded_by: actor_id.to_string(),
                    responded_at: now.to_string(),
                });
                self.status = ContactStatus::Responded;
                Ok(())
            }
            from => Err(invalid_transition(from, ContactStatus::Responded)),
        }
    }

    pub fn close(&mut self) {
        self.status = ContactStatus::Closed;
    }

    /// Route a requested status through the matching transition.
    pub fn apply_status(
        &mut self,
        target: ContactStatus,
        message: Option<&str>,
        actor_id: &str,
        now: &str,
    ) -> Result<(), AppError> {
        match target {
            ContactStatus::Read => self.mark_as_read(),
            ContactStatus::Responded => self.add_response(message.unwrap_or(""), actor_id, now),
            ContactStatus::Closed => {
                self.close();
                Ok(())
            }
            ContactStatus::New if self.status == ContactStatus::New => Ok(()),
            ContactStatus::New => Err(invalid_transition(self.status, target)),
        }
    }
}

fn invalid_transition(from: ContactStatus, to: ContactStatus) -> AppError {
    AppError::Validation(format!(
        "Cannot move a contact message from '{}' to '{}'",
        from.as_str(),
        to.as_str()
    ))
}

/// Request body for `POST /api/contact`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body for `PUT /api/contact/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(status: ContactStatus) -> Contact {
        Contact {
            id: "m1".into(),
            name: "Visitor".into(),
            email: "v@x.io".into(),
            phone: None,
            subject: "Hello".into(),
            message: "Hi there".into(),
            status,
            priority: Priority::Medium,
            assigned_to: None,
            response: None,
            age_in_days: 0,
            created_at: "2024-01-01T00:00:00.000000Z".into(),
            updated_at: "2024-01-01T00:00:00.000000Z".into(),
        }
    }

    #[test]
    fn test_forward_path() {
        let mut c = contact(ContactStatus::New);
        c.apply_status(ContactStatus::Read, None, "a", "t").unwrap();
        assert_eq!(c.status, ContactStatus::Read);

        c.apply_status(ContactStatus::Responded, Some("Thanks!"), "a", "t")
            .unwrap();
        assert_eq!(c.status, ContactStatus::Responded);
        assert_eq!(c.response.as_ref().unwrap().message, "Thanks!");

        c.apply_status(ContactStatus::Closed, None, "a", "t").unwrap();
        assert_eq!(c.status, ContactStatus::Closed);
    }

    #[test]
    fn test_new_can_be_answered_directly() {
        let mut c = contact(ContactStatus::New);
        c.apply_status(ContactStatus::Responded, Some("ok"), "admin", "t")
            .unwrap();
        assert_eq!(c.status, ContactStatus::Responded);
        assert_eq!(c.response.unwrap().responded_by, "admin");
    }

    #[test]
    fn test_responded_requires_message() {
        for status in [ContactStatus::New, ContactStatus::Read] {
            let mut c = contact(status);
            assert!(c.apply_status(ContactStatus::Responded, None, "a", "t").is_err());
            assert!(c
                .apply_status(ContactStatus::Responded, Some("  "), "a", "t")
                .is_err());
            assert_eq!(c.status, status);
            assert!(c.response.is_none());
        }
    }

    #[test]
    fn test_no_backward_transitions() {
        let mut c = contact(ContactStatus::Responded);
        assert!(c.apply_status(ContactStatus::Read, None, "a", "t").is_err());
        assert!(c.apply_status(ContactStatus::New, None, "a", "t").is_err());
        assert_eq!(c.status, ContactStatus::Responded);

        let mut c = contact(ContactStatus::Closed);
        assert!(c.apply_status(ContactStatus::Read, None, "a", "t").is_err());
        assert!(c
            .apply_status(ContactStatus::Responded, Some("late"), "a", "t")
            .is_err());
        assert_eq!(c.status, ContactStatus::Closed);
    }

    #[test]
    fn test_any_state_can_close() {
        for status in [
            ContactStatus::New,
            ContactStatus::Read,
            ContactStatus::Responded,
            ContactStatus::Closed,
        ] {
            let mut c = contact(status);
            c.apply_status(ContactStatus::Closed, None, "a", "t").unwrap();
            assert_eq!(c.status, ContactStatus::Closed);
        }
    }

    #[test]
    fn test_same_state_read_is_noop() {
        let mut c = contact(ContactStatus::Read);
        c.mark_as_read().unwrap();
        assert_eq!(c.status, ContactStatus::Read);
    }
}
