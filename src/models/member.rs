//! Member profile model.

use serde::{Deserialize, Serialize};

/// Avatar used when a member has neither `photo` nor `image`.
pub const DEFAULT_AVATAR: &str = "default-avatar.jpg";

/// One entry of a member's experience timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Experience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

/// A member shown on the public team page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub role: String,
    pub position: String,
    pub email: String,
    pub department: String,
    pub student_id: String,
    pub photo: String,
    pub image: String,
    pub profile_url: String,
    /// Derived on read from `profile_url` and the configured frontend URL
    #[serde(default)]
    pub full_profile_url: String,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub hobbies: Vec<String>,
    pub experience: Vec<Experience>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Member {
    /// Fill in `full_profile_url` for the given frontend base URL.
    pub fn with_profile_link(mut self, frontend_url: Option<&str>) -> Self {
        self.full_profile_url = full_profile_url(&self.profile_url, &self.id, frontend_url);
        self
    }
}

/// Request body for creating or updating a member. Only these fields are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub hobbies: Option<Vec<String>>,
    #[serde(default)]
    pub experience: Option<Vec<Experience>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Keep `photo` and `image` in sync: a missing one mirrors the other, and when both are
/// empty the default avatar is used.
pub fn sync_images(photo: &mut String, image: &mut String) {
    *photo = photo.trim().to_string();
    *image = image.trim().to_string();

    match (photo.is_empty(), image.is_empty()) {
        (true, true) => {
            *photo = DEFAULT_AVATAR.to_string();
            *image = DEFAULT_AVATAR.to_string();
        }
        (true, false) => *photo = image.clone(),
        (false, true) => *image = photo.clone(),
        (false, false) => {}
    }
}

/// Trim entries, drop blanks and duplicates, keep first-seen order.
pub fn normalize_set(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// Absolute or rooted profile URLs are returned as-is, bare paths are rooted, and members
/// without one link to their page on the frontend.
pub fn full_profile_url(profile_url: &str, id: &str, frontend_url: Option<&str>) -> String {
    if !profile_url.is_empty() {
        if profile_url.starts_with("http://")
            || profile_url.starts_with("https://")
            || profile_url.starts_with('/')
        {
            return profile_url.to_string();
        }
        return format!("/{}", profile_url);
    }

    match frontend_url {
        Some(base) if !base.is_empty() => {
            format!("{}/members/{}", base.trim_end_matches('/'), id)
        }
        _ => format!("/members/{}", id),
    }
}
