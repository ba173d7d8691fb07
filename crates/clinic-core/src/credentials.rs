//! Password hashing.
//!
//! Hashes use Argon2id with default parameters and a random salt from
//! `OsRng`, encoded as a PHC string.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{CoreError, Result};

/// Hash a password for storage.
///
/// # Errors
///
/// Returns [`CoreError::PasswordHash`] if hashing fails (rare).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::password_hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only if `hash` is not a valid
/// PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| CoreError::password_hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
