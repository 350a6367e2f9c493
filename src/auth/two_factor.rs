//! Time-based one-time password check for administrators with two-factor
//! authentication enabled.

use thiserror::Error;
use totp_rs::{Algorithm, Secret, TOTP};

/// Issuer label embedded in the TOTP parameters.
const ISSUER: &str = "backoffice";

/// Two-factor errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TwoFactorError {
    /// The stored secret is not valid base32 or is too short.
    #[error("invalid two-factor secret: {0}")]
    InvalidSecret(String),
}

fn build(secret_b32: &str, account: &str) -> Result<TOTP, TwoFactorError> {
    let bytes = Secret::Encoded(secret_b32.trim().to_uppercase())
        .to_bytes()
        .map_err(|e| TwoFactorError::InvalidSecret(format!("{e:?}")))?;

    TOTP::new(
        Algorithm::SHA1,
        6,
        1,
        30,
        bytes,
        Some(ISSUER.to_string()),
        account.to_string(),
    )
    .map_err(|e| TwoFactorError::InvalidSecret(e.to_string()))
}

/// Check a 6-digit code against a base32 secret at `now_secs`, accepting one
/// 30-second step of clock skew either way.
pub fn verify_code(
    secret_b32: &str,
    code: &str,
    account: &str,
    now_secs: u64,
) -> Result<bool, TwoFactorError> {
    let code = code.trim();
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Ok(false);
    }
    Ok(build(secret_b32, account)?.check(code, now_secs))
}

/// Generate the code valid at `now_secs`. Used by provisioning tools and tests.
pub fn generate_code(secret_b32: &str, account: &str, now_secs: u64) -> Result<String, TwoFactorError> {
    Ok(build(secret_b32, account)?.generate(now_secs))
}
