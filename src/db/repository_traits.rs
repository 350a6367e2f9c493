//! Collaborator traits consumed by the session orchestrators.
//!
//! The orchestrators depend on these narrow interfaces rather than on
//! [`Database`] directly, so tests can substitute in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    AdminLogRepository, AdminRepository, Administrator, Database, NewAdminLog, PermissionRecord,
    PermissionRepository, Role, RoleRepository,
};
use crate::Result;

/// Administrator lookups and the updates the session flows make.
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Find an administrator by username within a site. Soft-deleted rows are returned.
    async fn find_by_username_and_site(&self, username: &str, site_id: i64) -> Result<Option<Administrator>>;

    /// Find an administrator by id. Soft-deleted rows are returned.
    async fn find_by_id(&self, id: i64) -> Result<Option<Administrator>>;

    /// Record last-login IP and time.
    async fn update_login_meta(&self, id: i64, ip: &str, at: DateTime<Utc>) -> Result<()>;

    /// Bump the last-activity time.
    async fn touch(&self, id: i64, at: DateTime<Utc>) -> Result<()>;

    /// Replace the password hash.
    async fn update_password(&self, id: i64, hash: &str, at: DateTime<Utc>) -> Result<()>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Append an entry.
    async fn append(&self, entry: &NewAdminLog) -> Result<()>;
}

/// Source of enabled permission records.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Enabled records ordered by `(sort, id)`.
    async fn list_enabled(&self) -> Result<Vec<PermissionRecord>>;
}

/// Role lookups.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Find a role by id.
    async fn find_role(&self, id: i64) -> Result<Option<Role>>;
}

#[async_trait]
impl AdminStore for Database {
    async fn find_by_username_and_site(&self, username: &str, site_id: i64) -> Result<Option<Administrator>> {
        AdminRepository::new(self.pool()).get_by_username(site_id, username).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Administrator>> {
        AdminRepository::new(self.pool()).get_by_id(id).await
    }

    async fn update_login_meta(&self, id: i64, ip: &str, at: DateTime<Utc>) -> Result<()> {
        AdminRepository::new(self.pool()).update_login_meta(id, ip, at).await
    }

    async fn touch(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        AdminRepository::new(self.pool()).touch(id, at).await
    }

    async fn update_password(&self, id: i64, hash: &str, at: DateTime<Utc>) -> Result<()> {
        AdminRepository::new(self.pool()).update_password(id, hash, at).await
    }
}

#[async_trait]
impl AuditLog for Database {
    async fn append(&self, entry: &NewAdminLog) -> Result<()> {
        AdminLogRepository::new(self.pool()).append(entry).await?;
        Ok(())
    }
}

#[async_trait]
impl PermissionSource for Database {
    async fn list_enabled(&self) -> Result<Vec<PermissionRecord>> {
        PermissionRepository::new(self.pool()).list_enabled().await
    }
}

#[async_trait]
impl RoleDirectory for Database {
    async fn find_role(&self, id: i64) -> Result<Option<Role>> {
        RoleRepository::new(self.pool()).get_by_id(id).await
    }
}
