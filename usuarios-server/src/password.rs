//! Password hashing and verification (Argon2id)
//!
//! Hashes are PHC-format strings (`$argon2id$v=19$...`) and are what the
//! `contrasena` column holds. Hashing is memory-hard, so request handlers go
//! through [`hash_password_blocking`] to keep it off the async workers.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("invalid password hash: {0}")]
    InvalidHash(String),

    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Hash a password using Argon2id with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
///
/// The HTTP API never checks credentials itself. This is the counterpart
/// for code that reads `contrasena` back, such as a login flow built on
/// this crate.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_phc_and_verifies() {
        let hash = hash_password("after dark").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("after dark", &hash).unwrap());
        assert!(!verify_password("before dawn", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        let a = hash_password("p1").unwrap();
        let b = hash_password("p1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = verify_password("p1", "p1").unwrap_err();
        assert!(matches!(err, PasswordError::InvalidHash(_)));
    }

    #[tokio::test]
    async fn blocking_variant_hashes() {
        let hash = hash_password_blocking("p1".to_string()).await.unwrap();
        assert!(verify_password("p1", &hash).unwrap());
    }
}
