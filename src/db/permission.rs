//! Permission records backing the back-office menu tree.

use serde::{Deserialize, Serialize};

use super::admin::RecordStatus;
use super::DbPool;
use crate::Result;

/// Permission record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
pub enum PermissionKind {
    /// Navigable menu entry.
    Menu = 1,
    /// Fine-grained operation gate.
    Operation = 2,
}

/// A node of the permission table. `parent_id == 0` marks a root.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PermissionRecord {
    /// Record id.
    pub id: i64,
    /// Parent record id, 0 for roots.
    pub parent_id: i64,
    /// Display name.
    pub name: String,
    /// Menu or operation.
    pub kind: PermissionKind,
    /// Backend route guarded by this record.
    pub backend_url: String,
    /// Frontend route.
    pub frontend_url: String,
    /// Icon name.
    pub icon: String,
    /// Sort key, ascending.
    pub sort: i64,
    /// Enabled or disabled.
    pub status: RecordStatus,
}

/// Repository for permission records.
pub struct PermissionRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PermissionRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Enabled records ordered by `(sort, id)`.
    pub async fn list_enabled(&self) -> Result<Vec<PermissionRecord>> {
        let records = sqlx::query_as::<_, PermissionRecord>(
            "SELECT id, parent_id, name, type AS kind, backend_url, frontend_url, icon, sort, status
             FROM admin_permissions WHERE status = 1 ORDER BY sort, id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(records)
    }

    /// Insert a record, returning its id.
    pub async fn create(&self, record: &PermissionRecord) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO admin_permissions (parent_id, name, type, backend_url, frontend_url, icon, sort, status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(record.parent_id)
        .bind(&record.name)
        .bind(record.kind)
        .bind(&record.backend_url)
        .bind(&record.frontend_url)
        .bind(&record.icon)
        .bind(record.sort)
        .bind(record.status)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// Enable or disable a record.
    pub async fn set_status(&self, id: i64, status: RecordStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE admin_permissions SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
