//! Request-scoped administrator identity.
//!
//! Resolved once at the transport boundary from a validated token and passed
//! explicitly to every orchestrator.

use super::token::SessionClaims;

/// The authenticated administrator for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    /// Administrator id.
    pub admin_id: i64,
    /// Username at the time the token was issued.
    pub username: String,
    /// Site the administrator belongs to.
    pub site_id: i64,
}

impl AdminIdentity {
    /// Create an identity.
    pub fn new(admin_id: i64, username: impl Into<String>, site_id: i64) -> Self {
        Self {
            admin_id,
            username: username.into(),
            site_id,
        }
    }
}

impl From<SessionClaims> for AdminIdentity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            admin_id: claims.admin_id,
            username: claims.username,
            site_id: claims.site_id,
        }
    }
}
