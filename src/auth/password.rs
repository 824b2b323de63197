//! One-way password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::AppError;
use crate::models::UserCredentials;

/// Hash a plaintext password into a self-describing PHC string.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(plain.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// True iff `plain` hashes to the stored credential. Malformed stored hashes never verify.
pub fn verify_password(credentials: &UserCredentials, plain: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(&credentials.password_hash) else {
        tracing::warn!(
            user_id = %credentials.user.id,
            "Stored password hash could not be parsed"
        );
        return false;
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};

    fn credentials(password_hash: String) -> UserCredentials {
        UserCredentials {
            user: User {
                id: "u1".into(),
                name: "Test".into(),
                email: "t@example.com".into(),
                role: Role::User,
                created_at: "2024-01-01T00:00:00.000000Z".into(),
            },
            password_hash,
        }
    }

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("password123").unwrap();
        assert_ne!(hash, "password123");
        assert!(hash.starts_with("$argon2"));

        let creds = credentials(hash);
        assert!(verify_password(&creds, "password123"));
        assert!(!verify_password(&creds, "password124"));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(
            hash_password("same-password").unwrap(),
            hash_password("same-password").unwrap()
        );
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password(&credentials("not-a-phc-string".into()), ""));
    }
}
