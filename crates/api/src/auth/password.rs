//! Account passwords.
//!
//! Stored as Argon2id PHC strings, so the salt and cost parameters live in
//! the `users.password_hash` column next to the digest.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use pathway_core::error::CoreError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Upper bound keeps hashing cost bounded for oversized request bodies.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Reject a signup password outside the accepted length range.
pub fn check_new_password(password: &str) -> Result<(), CoreError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// `Ok(false)` on a wrong password. `Err` means the stored hash itself is
/// unreadable.
pub fn password_matches(password: &str, stored_hash: &str) -> Result<bool, HashError> {
    let stored = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn hash_is_argon2id_and_matches() {
        let hash = hash_password("correct-horse-battery").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(password_matches("correct-horse-battery", &hash).unwrap());
        assert!(!password_matches("correct-horse-batterx", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        assert_ne!(hash_password("applicant-1").unwrap(), hash_password("applicant-1").unwrap());
    }

    #[test]
    fn unreadable_stored_hash_is_error() {
        assert!(password_matches("anything", "plaintext-in-db").is_err());
    }

    #[test]
    fn new_password_length_bounds() {
        assert_matches!(check_new_password("short"), Err(CoreError::Validation(m)) if m.contains("at least 8"));
        assert!(check_new_password("exactly8").is_ok());
        assert!(check_new_password(&"x".repeat(MAX_PASSWORD_LENGTH)).is_ok());
        assert_matches!(
            check_new_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1)),
            Err(CoreError::Validation(_))
        );
    }
}
