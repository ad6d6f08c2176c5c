use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("password does not match")]
    Mismatch,
}

/// Hash a password with Argon2id and a fresh random salt.
/// Returns the PHC string (algorithm, params, salt and digest in one value).
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
///
/// A hash that fails to parse is reported as a mismatch; callers can't tell
/// a corrupt record from a wrong password, and don't need to.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::Mismatch)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}
