//! Administrator repository.
//!
//! CRUD operations on the `admins` table. Soft-deleted rows stay in the table
//! and are returned by the id/username lookups; listings exclude them.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};

use super::admin::{AdminSummary, AdminUpdate, Administrator, NewAdmin, RecordStatus};
use super::{page_offset, DbPool};
use crate::{BackofficeError, Result};

const ADMIN_COLUMNS: &str = "id, site_id, username, nickname, password, role_id, status,
    two_factor_enabled, two_factor_secret, last_login_ip, last_login_at, deleted_at,
    created_at, updated_at";

/// Listing filter for administrators.
#[derive(Debug, Clone)]
pub struct AdminListFilter {
    /// Site to list.
    pub site_id: i64,
    /// Substring match on username.
    pub username: Option<String>,
    /// Status filter.
    pub status: Option<RecordStatus>,
    /// 1-based page.
    pub page: i64,
    /// Page size.
    pub size: i64,
}

/// Escape `LIKE` wildcards so the input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl AdminListFilter {
    /// First page of ten for a site.
    pub fn new(site_id: i64) -> Self {
        Self {
            site_id,
            username: None,
            status: None,
            page: 1,
            size: 10,
        }
    }

    fn push_conditions(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        query.push(" WHERE a.site_id = ");
        query.push_bind(self.site_id);
        query.push(" AND a.deleted_at IS NULL");
        if let Some(ref username) = self.username {
            query.push(" AND a.username LIKE ");
            query.push_bind(format!("%{}%", escape_like(username)));
            query.push(" ESCAPE '\\'");
        }
        if let Some(status) = self.status {
            query.push(" AND a.status = ");
            query.push_bind(status);
        }
    }
}

/// Repository for administrator operations.
pub struct AdminRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert an administrator and return the stored row.
    pub async fn create(&self, new_admin: &NewAdmin) -> Result<Administrator> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO admins (site_id, username, nickname, password, role_id, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(new_admin.site_id)
        .bind(&new_admin.username)
        .bind(&new_admin.nickname)
        .bind(&new_admin.password)
        .bind(new_admin.role_id)
        .bind(new_admin.status)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BackofficeError::NotFound("administrator".to_string()))
    }

    /// Get an administrator by id.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Administrator>> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE id = ?");
        let admin = sqlx::query_as::<_, Administrator>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(admin)
    }

    /// Get an administrator by username within a site.
    pub async fn get_by_username(&self, site_id: i64, username: &str) -> Result<Option<Administrator>> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE site_id = ? AND username = ?");
        let admin = sqlx::query_as::<_, Administrator>(&sql)
            .bind(site_id)
            .bind(username)
            .fetch_optional(self.pool)
            .await?;
        Ok(admin)
    }

    /// Whether a username is taken within a site, soft-deleted rows included.
    pub async fn username_exists(&self, site_id: i64, username: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM admins WHERE site_id = ? AND username = ?)",
        )
        .bind(site_id)
        .bind(username)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    /// Count live administrators of a site.
    pub async fn count_by_site(&self, site_id: i64) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM admins WHERE site_id = ? AND deleted_at IS NULL")
                .bind(site_id)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }

    /// Apply a partial update. Returns the updated row, or `None` if not found.
    pub async fn update(&self, id: i64, update: &AdminUpdate) -> Result<Option<Administrator>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE admins SET ");
        let mut separated = query.separated(", ");

        if let Some(ref password) = update.password {
            separated.push("password = ");
            separated.push_bind_unseparated(password.clone());
        }
        if let Some(ref nickname) = update.nickname {
            separated.push("nickname = ");
            separated.push_bind_unseparated(nickname.clone());
        }
        if let Some(role_id) = update.role_id {
            separated.push("role_id = ");
            separated.push_bind_unseparated(role_id);
        }
        if let Some(status) = update.status {
            separated.push("status = ");
            separated.push_bind_unseparated(status);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Record a successful login.
    pub async fn update_login_meta(&self, id: i64, ip: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE admins SET last_login_ip = ?, last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(ip)
            .bind(at)
            .bind(at)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Bump the last-activity time.
    pub async fn touch(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE admins SET updated_at = ? WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Replace the password hash.
    pub async fn update_password(&self, id: i64, hash: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE admins SET password = ?, updated_at = ? WHERE id = ?")
            .bind(hash)
            .bind(at)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Enable two-factor authentication with the given base32 secret, or
    /// disable it when `secret` is `None`.
    pub async fn set_two_factor(&self, id: i64, secret: Option<&str>) -> Result<()> {
        sqlx::query("UPDATE admins SET two_factor_enabled = ?, two_factor_secret = ?, updated_at = ? WHERE id = ?")
            .bind(secret.is_some())
            .bind(secret)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Soft-delete an administrator. Returns false when it was not live.
    pub async fn soft_delete(&self, id: i64) -> Result<bool> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE admins SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List live administrators, newest first, with role names and the total count.
    pub async fn list(&self, filter: &AdminListFilter) -> Result<(Vec<AdminSummary>, i64)> {
        let mut count_query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM admins a");
        filter.push_conditions(&mut count_query);
        let total: i64 = count_query.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT a.id, a.username, a.nickname, a.role_id, r.name AS role_name, a.status,
                    a.last_login_ip, a.last_login_at, a.created_at
             FROM admins a LEFT JOIN admin_roles r ON r.id = a.role_id",
        );
        filter.push_conditions(&mut query);
        query.push(" ORDER BY a.id DESC LIMIT ");
        query.push_bind(filter.size);
        query.push(" OFFSET ");
        query.push_bind(page_offset(filter.page, filter.size));

        let admins = query
            .build_query_as::<AdminSummary>()
            .fetch_all(self.pool)
            .await?;

        Ok((admins, total))
    }
}
