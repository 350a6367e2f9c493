//! Administrator management.
//!
//! Account CRUD, audit log listing and role lookup. Every operation first
//! resolves the acting administrator's live record, so a disabled or deleted
//! account cannot manage anything, and is scoped to the actor's site.

mod account;
mod log;
mod role;

pub use account::{bootstrap, AccountService, CreateAdmin, ListAdmins, UpdateAdmin};
pub use log::{AuditLogService, ListLogs};
pub use role::RoleService;

use thiserror::Error;
use tracing::error;

use crate::auth::{AdminIdentity, SessionError, ValidationError};
use crate::db::{AdminLogRepository, Database, NewAdminLog};
use crate::BackofficeError;

/// Upper bound on page size for listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Admin management errors. Display strings are client-facing.
#[derive(Error, Debug)]
pub enum AdminError {
    /// The actor is not allowed to act (not logged in, disabled).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Malformed input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Username already used within the site.
    #[error("username already taken")]
    UsernameTaken,

    /// An administrator tried to delete their own account.
    #[error("cannot delete yourself")]
    CannotDeleteSelf,

    /// Target record not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Storage failure. The detail is logged, not shown.
    #[error("system error, try again")]
    Internal(String),
}

impl From<BackofficeError> for AdminError {
    fn from(e: BackofficeError) -> Self {
        match e {
            BackofficeError::NotFound(what) => AdminError::NotFound(what),
            other => AdminError::Internal(other.to_string()),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: i64,
    /// 1-based page number.
    pub page: i64,
    /// Page size.
    pub size: i64,
}

/// Normalise paging input: page defaults to 1, size to `default_size`,
/// capped at [`MAX_PAGE_SIZE`].
pub(crate) fn paging(page: Option<i64>, size: Option<i64>, default_size: i64) -> (i64, i64) {
    let page = page.filter(|p| *p > 0).unwrap_or(1);
    let size = size.filter(|s| *s > 0).unwrap_or(default_size).min(MAX_PAGE_SIZE);
    (page, size)
}

/// Append an audit entry, logging instead of failing.
pub(crate) async fn record_action(db: &Database, actor: &AdminIdentity, ip: &str, remark: String) {
    let entry = NewAdminLog {
        site_id: actor.site_id,
        admin_id: actor.admin_id,
        admin_username: actor.username.clone(),
        ip: ip.to_string(),
        remark,
    };
    if let Err(e) = AdminLogRepository::new(db.pool()).append(&entry).await {
        error!(admin_id = actor.admin_id, remark = %entry.remark, "failed to write audit entry: {}", e);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::auth::{hash_password, AdminIdentity};
    use crate::db::{AdminRepository, Database, NewAdmin};

    pub async fn setup() -> (Database, AdminIdentity) {
        let db = Database::open_in_memory().await.unwrap();
        let hash = hash_password("secret1").unwrap();
        let admin = AdminRepository::new(db.pool())
            .create(&NewAdmin::new(1, "admin1", hash, "Admin One", 1))
            .await
            .unwrap();
        let actor = AdminIdentity::new(admin.id, admin.username, admin.site_id);
        (db, actor)
    }
}
