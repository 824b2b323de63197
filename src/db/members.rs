//! Member store.

use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{new_id, parse_json, to_json, Repository};
use crate::errors::AppError;
use crate::models::{normalize_set, sync_images, timestamp_now, Experience, Member, MemberRequest};
use crate::validation::{max_len, required};

const MEMBER_COLUMNS: &str = "id, name, bio, role, position, email, department, student_id, photo, image, profile_url, skills, languages, hobbies, experience, is_active, created_at, updated_at";
const MAX_BIO_LEN: usize = 1000;

impl Repository {
    /// Active members, newest first. This is the listing the public team page uses.
    pub async fn list_active_members(&self) -> Result<Vec<Member>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM members WHERE is_active = 1 ORDER BY created_at DESC, rowid DESC",
            MEMBER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    pub async fn get_member(&self, id: &str) -> Result<Member, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM members WHERE id = ?", MEMBER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(member_from_row)
            .ok_or_else(|| member_not_found(id))
    }

    pub async fn create_member(&self, request: &MemberRequest) -> Result<Member, AppError> {
        let now = timestamp_now();
        let mut member = Member {
            id: new_id(),
            name: required(request.name.as_deref(), "Please provide member name")?,
            bio: required(request.bio.as_deref(), "Please provide a short bio")?,
            role: String::new(),
            position: String::new(),
            email: String::new(),
            department: String::new(),
            student_id: String::new(),
            photo: String::new(),
            image: String::new(),
            profile_url: String::new(),
            full_profile_url: String::new(),
            skills: Vec::new(),
            languages: Vec::new(),
            hobbies: Vec::new(),
            experience: Vec::new(),
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        };
        apply_member_fields(&mut member, request)?;

        sqlx::query(&format!(
            "INSERT INTO members ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            MEMBER_COLUMNS
        ))
        .bind(&member.id)
        .bind(&member.name)
        .bind(&member.bio)
        .bind(&member.role)
        .bind(&member.position)
        .bind(&member.email)
        .bind(&member.department)
        .bind(&member.student_id)
        .bind(&member.photo)
        .bind(&member.image)
        .bind(&member.profile_url)
        .bind(to_json(&member.skills)?)
        .bind(to_json(&member.languages)?)
        .bind(to_json(&member.hobbies)?)
        .bind(to_json(&member.experience)?)
        .bind(member.is_active as i32)
        .bind(&member.created_at)
        .bind(&member.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(member_id = %member.id, "Created member");
        Ok(member)
    }

    pub async fn update_member(&self, id: &str, request: &MemberRequest) -> Result<Member, AppError> {
        let mut member = self.get_member(id).await?;
        apply_member_fields(&mut member, request)?;
        member.updated_at = timestamp_now();

        let result = sqlx::query(
            "UPDATE members SET name = ?, bio = ?, role = ?, position = ?, email = ?, department = ?, student_id = ?, photo = ?, image = ?, profile_url = ?, skills = ?, languages = ?, hobbies = ?, experience = ?, is_active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&member.name)
        .bind(&member.bio)
        .bind(&member.role)
        .bind(&member.position)
        .bind(&member.email)
        .bind(&member.department)
        .bind(&member.student_id)
        .bind(&member.photo)
        .bind(&member.image)
        .bind(&member.profile_url)
        .bind(to_json(&member.skills)?)
        .bind(to_json(&member.languages)?)
        .bind(to_json(&member.hobbies)?)
        .bind(to_json(&member.experience)?)
        .bind(member.is_active as i32)
        .bind(&member.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(member_not_found(id));
        }
        Ok(member)
    }

    pub async fn delete_member(&self, id: &str) -> Result<(), AppError> {
        self.delete_by_id("members", id, "Member").await
    }
}

/// Overlay the provided fields onto `member`, then re-check the schema rules.
fn apply_member_fields(member: &mut Member, request: &MemberRequest) -> Result<(), AppError> {
    if let Some(name) = request.name.as_deref() {
        member.name = required(Some(name), "Please provide member name")?;
    }
    if let Some(bio) = request.bio.as_deref() {
        member.bio = required(Some(bio), "Please provide a short bio")?;
    }
    max_len(&member.bio, MAX_BIO_LEN, "Bio")?;

    let text_fields = [
        (&request.role, &mut member.role),
        (&request.position, &mut member.position),
        (&request.email, &mut member.email),
        (&request.department, &mut member.department),
        (&request.student_id, &mut member.student_id),
        (&request.photo, &mut member.photo),
        (&request.image, &mut member.image),
        (&request.profile_url, &mut member.profile_url),
    ];
    for (incoming, field) in text_fields {
        if let Some(value) = incoming {
            *field = value.trim().to_string();
        }
    }
    sync_images(&mut member.photo, &mut member.image);

    if let Some(skills) = &request.skills {
        member.skills = normalize_set(skills.clone());
    }
    if let Some(languages) = &request.languages {
        member.languages = normalize_set(languages.clone());
    }
    if let Some(hobbies) = &request.hobbies {
        member.hobbies = normalize_set(hobbies.clone());
    }
    if let Some(experience) = &request.experience {
        member.experience = experience
            .iter()
            .map(|e| Experience {
                title: e.title.trim().to_string(),
                company: e.company.trim().to_string(),
                duration: e.duration.trim().to_string(),
                description: e.description.trim().to_string(),
            })
            .collect();
    }
    if let Some(is_active) = request.is_active {
        member.is_active = is_active;
    }
    Ok(())
}

fn member_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Member not found with id of {}", id))
}

fn member_from_row(row: &SqliteRow) -> Member {
    let is_active: i32 = row.get("is_active");
    let skills: String = row.get("skills");
    let languages: String = row.get("languages");
    let hobbies: String = row.get("hobbies");
    let experience: String = row.get("experience");
    Member {
        id: row.get("id"),
        name: row.get("name"),
        bio: row.get("bio"),
        role: row.get("role"),
        position: row.get("position"),
        email: row.get("email"),
        department: row.get("department"),
        student_id: row.get("student_id"),
        photo: row.get("photo"),
        image: row.get("image"),
        profile_url: row.get("profile_url"),
        full_profile_url: String::new(),
        skills: parse_json(&skills),
        languages: parse_json(&languages),
        hobbies: parse_json(&hobbies),
        experience: parse_json(&experience),
        is_active: is_active != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_member() -> Member {
        Member {
            id: "m1".into(),
            name: "Old".into(),
            bio: "Old bio".into(),
            role: String::new(),
            position: String::new(),
            email: String::new(),
            department: String::new(),
            student_id: String::new(),
            photo: "a.jpg".into(),
            image: "a.jpg".into(),
            profile_url: String::new(),
            full_profile_url: String::new(),
            skills: vec![],
            languages: vec![],
            hobbies: vec![],
            experience: vec![],
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_partial_update_keeps_untouched_fields() {
        let mut member = blank_member();
        let request = MemberRequest {
            position: Some(" Lead ".into()),
            skills: Some(vec!["Go".into(), "Go".into()]),
            ..Default::default()
        };
        apply_member_fields(&mut member, &request).unwrap();

        assert_eq!(member.name, "Old");
        assert_eq!(member.position, "Lead");
        assert_eq!(member.skills, vec!["Go"]);
        assert_eq!(member.photo, "a.jpg");
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut member = blank_member();
        let request = MemberRequest {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            apply_member_fields(&mut member, &request),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_oversized_bio_rejected() {
        let mut member = blank_member();
        let request = MemberRequest {
            bio: Some("x".repeat(MAX_BIO_LEN + 1)),
            ..Default::default()
        };
        assert!(apply_member_fields(&mut member, &request).is_err());
    }

    #[test]
    fn test_new_image_mirrors_into_photo_when_photo_cleared() {
        let mut member = blank_member();
        let request = MemberRequest {
            photo: Some(String::new()),
            image: Some("/assets/new.png".into()),
            ..Default::default()
        };
        apply_member_fields(&mut member, &request).unwrap();
        assert_eq!(member.photo, "/assets/new.png");
        assert_eq!(member.image, "/assets/new.png");
    }
}
