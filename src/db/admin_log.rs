//! Audit trail of administrator actions.
//!
//! Entries are append-only: nothing here updates or deletes them.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};

use super::{page_offset, DbPool};
use crate::Result;

/// A recorded administrator action.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminLog {
    /// Entry id.
    pub id: i64,
    /// Site of the acting administrator.
    pub site_id: i64,
    /// Acting administrator.
    pub admin_id: i64,
    /// Username at the time of the action.
    pub admin_username: String,
    /// Client IP.
    pub ip: String,
    /// Human-readable description.
    pub remark: String,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}

/// A new audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdminLog {
    /// Site of the acting administrator.
    pub site_id: i64,
    /// Acting administrator.
    pub admin_id: i64,
    /// Username at the time of the action.
    pub admin_username: String,
    /// Client IP.
    pub ip: String,
    /// Human-readable description.
    pub remark: String,
}

/// Listing filter for audit entries.
#[derive(Debug, Clone)]
pub struct AdminLogFilter {
    /// Site to list.
    pub site_id: i64,
    /// Exact username match.
    pub username: Option<String>,
    /// Inclusive lower bound.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub end: Option<DateTime<Utc>>,
    /// 1-based page.
    pub page: i64,
    /// Page size.
    pub size: i64,
}

impl AdminLogFilter {
    /// First page of fifty for a site.
    pub fn new(site_id: i64) -> Self {
        Self {
            site_id,
            username: None,
            start: None,
            end: None,
            page: 1,
            size: 50,
        }
    }

    fn push_conditions(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        query.push(" WHERE site_id = ");
        query.push_bind(self.site_id);
        if let Some(ref username) = self.username {
            query.push(" AND admin_username = ");
            query.push_bind(username.clone());
        }
        // The range applies only when both bounds are present.
        if let (Some(start), Some(end)) = (self.start, self.end) {
            query.push(" AND created_at >= ");
            query.push_bind(start);
            query.push(" AND created_at <= ");
            query.push_bind(end);
        }
    }
}

/// Repository for audit entries.
pub struct AdminLogRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AdminLogRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Append an entry stamped with `at`.
    pub async fn append_at(&self, entry: &NewAdminLog, at: DateTime<Utc>) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO admin_logs (site_id, admin_id, admin_username, ip, remark, created_at)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(entry.site_id)
        .bind(entry.admin_id)
        .bind(&entry.admin_username)
        .bind(&entry.ip)
        .bind(&entry.remark)
        .bind(at)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// Append an entry stamped with the current time.
    pub async fn append(&self, entry: &NewAdminLog) -> Result<i64> {
        self.append_at(entry, Utc::now()).await
    }

    /// List entries, newest first, with the total count.
    pub async fn list(&self, filter: &AdminLogFilter) -> Result<(Vec<AdminLog>, i64)> {
        let mut count_query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM admin_logs");
        filter.push_conditions(&mut count_query);
        let total: i64 = count_query.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, site_id, admin_id, admin_username, ip, remark, created_at FROM admin_logs",
        );
        filter.push_conditions(&mut query);
        query.push(" ORDER BY id DESC LIMIT ");
        query.push_bind(filter.size);
        query.push(" OFFSET ");
        query.push_bind(page_offset(filter.page, filter.size));

        let logs = query.build_query_as::<AdminLog>().fetch_all(self.pool).await?;
        Ok((logs, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use chrono::{Duration, TimeZone};

    fn entry(username: &str, remark: &str) -> NewAdminLog {
        NewAdminLog {
            site_id: 1,
            admin_id: 1,
            admin_username: username.to_string(),
            ip: "127.0.0.1".to_string(),
            remark: remark.to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_and_list_newest_first() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = AdminLogRepository::new(db.pool());

        repo.append(&entry("admin1", "login succeeded")).await.unwrap();
        repo.append(&entry("admin1", "logged out")).await.unwrap();

        let (logs, total) = repo.list(&AdminLogFilter::new(1)).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(logs[0].remark, "logged out");
        assert_eq!(logs[1].remark, "login succeeded");
        assert_eq!(logs[0].ip, "127.0.0.1");

        let (other_site, total) = repo.list(&AdminLogFilter::new(2)).await.unwrap();
        assert!(other_site.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_username_filter_is_exact() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = AdminLogRepository::new(db.pool());

        repo.append(&entry("admin1", "a")).await.unwrap();
        repo.append(&entry("admin10", "b")).await.unwrap();

        let mut filter = AdminLogFilter::new(1);
        filter.username = Some("admin1".to_string());
        let (logs, total) = repo.list(&filter).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(logs[0].remark, "a");
    }

    #[tokio::test]
    async fn test_time_range_needs_both_bounds() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = AdminLogRepository::new(db.pool());

        let base = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        repo.append_at(&entry("admin1", "old"), base - Duration::days(10)).await.unwrap();
        repo.append_at(&entry("admin1", "inside"), base).await.unwrap();
        repo.append_at(&entry("admin1", "new"), base + Duration::days(10)).await.unwrap();

        let mut filter = AdminLogFilter::new(1);
        filter.start = Some(base - Duration::days(1));
        filter.end = Some(base + Duration::days(1));
        let (logs, total) = repo.list(&filter).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(logs[0].remark, "inside");

        filter.end = None;
        let (_, total) = repo.list(&filter).await.unwrap();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_paging() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = AdminLogRepository::new(db.pool());
        for i in 0..5 {
            repo.append(&entry("admin1", &format!("action {i}"))).await.unwrap();
        }

        let mut filter = AdminLogFilter::new(1);
        filter.size = 2;
        filter.page = 3;
        let (logs, total) = repo.list(&filter).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].remark, "action 0");
    }
}
