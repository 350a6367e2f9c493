//! Administrator roles.

use chrono::{DateTime, Utc};

use super::admin::RecordStatus;
use super::DbPool;
use crate::{BackofficeError, Result};

/// A named role within a site.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Role {
    /// Role id.
    pub id: i64,
    /// Owning site.
    pub site_id: i64,
    /// Display name.
    pub name: String,
    /// Enabled or disabled.
    pub status: RecordStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Repository for role lookups.
pub struct RoleRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> RoleRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a role.
    pub async fn create(&self, site_id: i64, name: &str, status: RecordStatus) -> Result<Role> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO admin_roles (site_id, name, status, created_at) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(site_id)
        .bind(name)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BackofficeError::NotFound("role".to_string()))
    }

    /// Get a role by id.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, site_id, name, status, created_at FROM admin_roles WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(role)
    }

    /// Enabled roles of a site, ordered by id.
    pub async fn list_enabled(&self, site_id: i64) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT id, site_id, name, status, created_at FROM admin_roles
             WHERE site_id = ? AND status = 1 ORDER BY id",
        )
        .bind(site_id)
        .fetch_all(self.pool)
        .await?;
        Ok(roles)
    }
}
