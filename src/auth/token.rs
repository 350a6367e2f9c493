//! Signed session tokens.
//!
//! Tokens are HS256 JWTs carrying the administrator's identity. The server
//! keeps no session state: a token is valid while its signature verifies and
//! it has not expired.

use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::identity::AdminIdentity;

/// Token lifetime: 24 hours.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Discriminates back-office sessions from end-user sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    /// Back-office administrator.
    Admin,
    /// End user of the public site.
    User,
}

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Administrator id.
    pub admin_id: i64,
    /// End-user id; always 0 for administrator tokens.
    pub user_id: i64,
    /// Administrator username.
    pub username: String,
    /// Site id.
    pub site_id: i64,
    /// Subject kind.
    pub kind: SubjectKind,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expires at (unix seconds), always `iat + TOKEN_TTL_SECS`.
    pub exp: i64,
    /// Unique token id.
    pub jti: String,
}

/// Token errors.
///
/// The variants are distinct for logging; the transport collapses all of
/// them into a single "not logged in" message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No signing secret is configured.
    #[error("token signing secret is not configured")]
    MissingSecret,

    /// The token could not be decoded.
    #[error("malformed token")]
    Malformed,

    /// The token is past its expiry.
    #[error("token expired")]
    Expired,

    /// The signature does not match the configured secret.
    #[error("token signature mismatch")]
    SignatureMismatch,

    /// The token was not issued for an administrator.
    #[error("token subject is not an administrator")]
    WrongSubject,

    /// Signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::MissingSecret => "missing_secret",
            TokenError::Malformed => "malformed",
            TokenError::Expired => "expired",
            TokenError::SignatureMismatch => "signature_mismatch",
            TokenError::WrongSubject => "wrong_subject",
            TokenError::Signing(_) => "signing",
        }
    }
}

/// Issues and validates session tokens.
#[derive(Clone)]
pub struct TokenService {
    keys: Option<(EncodingKey, DecodingKey)>,
    validation: Validation,
    ttl_secs: i64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("configured", &self.keys.is_some())
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl TokenService {
    /// Create a token service. An empty secret yields a service that refuses
    /// to issue or accept any token.
    pub fn new(secret: &str) -> Self {
        let keys = (!secret.is_empty()).then(|| {
            (
                EncodingKey::from_secret(secret.as_bytes()),
                DecodingKey::from_secret(secret.as_bytes()),
            )
        });

        // Expiry is checked against our own clock in `validate_at`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        Self {
            keys,
            validation,
            ttl_secs: TOKEN_TTL_SECS,
        }
    }

    /// Whether a signing secret is configured.
    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Issue a token for an administrator, stamped with the current time.
    pub fn issue(&self, identity: &AdminIdentity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as of `now`.
    pub fn issue_at(&self, identity: &AdminIdentity, now: DateTime<Utc>) -> Result<String, TokenError> {
        let (encoding_key, _) = self.keys.as_ref().ok_or(TokenError::MissingSecret)?;

        let iat = now.timestamp();
        let claims = SessionClaims {
            admin_id: identity.admin_id,
            user_id: 0,
            username: identity.username.clone(),
            site_id: identity.site_id,
            kind: SubjectKind::Admin,
            iat,
            exp: iat + self.ttl_secs,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token against the current time.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`: signature first, then expiry, then subject.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let (_, decoding_key) = self.keys.as_ref().ok_or(TokenError::MissingSecret)?;

        let data = decode::<SessionClaims>(token, decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;
        let claims = data.claims;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        if claims.kind != SubjectKind::Admin || claims.admin_id <= 0 {
            return Err(TokenError::WrongSubject);
        }

        Ok(claims)
    }
}
