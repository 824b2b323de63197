//! Credential store: user accounts and password hashes.

use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{new_id, Repository};
use crate::auth::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::{timestamp_now, Role, User, UserCredentials};
use crate::validation::{max_len, normalize_email, required, validate_email, validate_password};

const USER_COLUMNS: &str = "id, name, email, role, created_at";
const MAX_NAME_LEN: usize = 50;

impl Repository {
    /// Register a new account. The password is hashed before it reaches the database.
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let name = required(Some(name), "Please provide a name")?;
        max_len(&name, MAX_NAME_LEN, "Name")?;
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password)?;

        if self.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Duplicate(
                "User already exists with this email".to_string(),
            ));
        }

        let user = User {
            id: new_id(),
            name,
            email,
            role,
            created_at: timestamp_now(),
        };
        let password_hash = hash_password(password)?;

        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&password_hash)
        .bind(user.role.as_str())
        .bind(&user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Duplicate(_) => {
                AppError::Duplicate("User already exists with this email".to_string())
            }
            other => other,
        })?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "Registered user");
        Ok(user)
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Public lookup that returns the password hash. Used for credential checks.
    pub async fn find_user_by_email_with_secret(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        self.find_credentials("email", &normalize_email(email)).await
    }

    /// The single query that selects `password_hash`. `column` is always a fixed identifier.
    async fn find_credentials(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {}, password_hash FROM users WHERE {} = ?",
            USER_COLUMNS, column
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(credentials_from_row))
    }

    /// Partial update of name and/or email. A changed email is re-validated for format and
    /// uniqueness.
    pub async fn update_user_profile(
        &self,
        id: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User, AppError> {
        let mut user = self
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found with id of {}", id)))?;

        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            max_len(name, MAX_NAME_LEN, "Name")?;
            user.name = name.to_string();
        }

        if let Some(email) = email.map(normalize_email).filter(|e| !e.is_empty()) {
            if email != user.email {
                validate_email(&email)?;
                if let Some(existing) = self.find_user_by_email(&email).await? {
                    if existing.id != user.id {
                        return Err(AppError::Duplicate(
                            "User already exists with this email".to_string(),
                        ));
                    }
                }
                user.email = email;
            }
        }

        sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.id)
            .execute(&self.pool)
            .await?;

        Ok(user)
    }

    /// Replace the password after verifying the current one.
    pub async fn change_user_password(
        &self,
        id: &str,
        current_plain: &str,
        new_plain: &str,
    ) -> Result<User, AppError> {
        let credentials = self
            .find_credentials("id", id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found with id of {}", id)))?;

        if !verify_password(&credentials, current_plain) {
            return Err(AppError::Auth("Password is incorrect".to_string()));
        }
        validate_password(new_plain)?;

        let password_hash = hash_password(new_plain)?;
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(&password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id = %id, "Password changed");
        Ok(credentials.user)
    }

    /// Create the configured admin account unless the email is already taken.
    pub async fn ensure_admin(&self, name: &str, email: &str, password: &str) -> Result<(), AppError> {
        if self.find_user_by_email(email).await?.is_some() {
            tracing::info!("Admin bootstrap skipped: account already exists");
            return Ok(());
        }
        self.register_user(name, email, password, Role::Admin).await?;
        Ok(())
    }
}

fn user_from_row(row: &SqliteRow) -> User {
    let role: String = row.get("role");
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: Role::parse(&role).unwrap_or_default(),
        created_at: row.get("created_at"),
    }
}

fn credentials_from_row(row: &SqliteRow) -> UserCredentials {
    UserCredentials {
        user: user_from_row(row),
        password_hash: row.get("password_hash"),
    }
}
