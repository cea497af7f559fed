//! Password hashing and verification using Argon2id
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Longest accepted password, in bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password exceeds {} bytes", MAX_PASSWORD_BYTES)]
    PasswordTooLong,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("invalid password hash format: {0}")]
    MalformedHash(String),
}

/// Hash a password with a fresh random salt.
///
/// Returns a PHC-formatted string safe for storage. Two calls with the same
/// input produce different hashes.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(CredentialError::PasswordTooLong);
    }

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Verify a password against a stored hash.
///
/// `Ok(false)` means mismatch; `Err` means the stored hash could not be used.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, CredentialError> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|e| CredentialError::MalformedHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Hash(e.to_string())),
    }
}
