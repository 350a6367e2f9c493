//! Password hashing and verification.
//!
//! Uses Argon2id. Empty and out-of-range inputs are rejected by the callers
//! (see [`crate::auth::validation`]), not here.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;
use thiserror::Error;

/// Password hashing errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Hasher parameters were rejected.
    #[error("invalid hasher parameters: {0}")]
    Params(String),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),
}

/// Memory cost in KiB.
const M_COST: u32 = 19456;
/// Iterations.
const T_COST: u32 = 2;
/// Lanes.
const P_COST: u32 = 1;

fn create_argon2() -> Result<Argon2<'static>, PasswordError> {
    let params =
        Params::new(M_COST, T_COST, P_COST, None).map_err(|e| PasswordError::Params(e.to_string()))?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

/// Hash a password, returning a PHC-formatted string that carries salt and parameters.
///
/// # Examples
///
/// ```
/// use backoffice::auth::{hash_password, verify_password};
///
/// let hash = hash_password("secret1").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// assert!(verify_password(&hash, "secret1"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = create_argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a candidate password against a stored hash.
///
/// Returns `false` on mismatch and also when the stored hash cannot be parsed;
/// a corrupt hash must never let anyone in.
pub fn verify_password(stored_hash: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    // Parameters come from the parsed hash.
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}
