use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing error: {0}")]
    Hash(String),
}

/// Derive a salted one-way hash for storage. bcrypt generates its own salt,
/// so two hashes of the same password never compare equal.
pub fn hash(plain: &str) -> Result<String, PasswordError> {
    let cost = config::config().security.bcrypt_cost;
    bcrypt::hash(plain, cost).map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Compare a candidate password against a stored hash. Any verification
/// failure, including an unreadable hash, counts as a mismatch.
pub fn verify(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}
