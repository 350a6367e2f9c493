//! Audit log listing.

use crate::auth::{authorize, AdminIdentity, ValidationError};
use crate::datetime::parse_bound;
use crate::db::{AdminLog, AdminLogFilter, AdminLogRepository, Database};

use super::{paging, AdminError, Page};

/// Default page size for the audit log.
const DEFAULT_PAGE_SIZE: i64 = 50;

/// Input for listing audit entries.
#[derive(Debug, Clone, Default)]
pub struct ListLogs {
    /// Exact username filter.
    pub username: Option<String>,
    /// Inclusive lower bound.
    pub start: Option<String>,
    /// Inclusive upper bound.
    pub end: Option<String>,
    /// 1-based page.
    pub page: Option<i64>,
    /// Page size.
    pub size: Option<i64>,
}

fn parse_optional_bound(value: Option<&str>) -> Result<Option<chrono::DateTime<chrono::Utc>>, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_bound(v).map(Some).ok_or(ValidationError::InvalidTime),
        None => Ok(None),
    }
}

/// Read access to the audit trail.
pub struct AuditLogService<'a> {
    db: &'a Database,
}

impl<'a> AuditLogService<'a> {
    /// Create a new AuditLogService.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List entries of the actor's site, newest first. The time range is
    /// applied only when both bounds are given.
    pub async fn list(&self, actor: &AdminIdentity, input: ListLogs) -> Result<Page<AdminLog>, AdminError> {
        let start = parse_optional_bound(input.start.as_deref())?;
        let end = parse_optional_bound(input.end.as_deref())?;

        let actor = authorize(self.db, actor).await?;

        let (page, size) = paging(input.page, input.size, DEFAULT_PAGE_SIZE);
        let filter = AdminLogFilter {
            site_id: actor.site_id,
            username: input.username.filter(|u| !u.trim().is_empty()),
            start,
            end,
            page,
            size,
        };
        let (items, total) = AdminLogRepository::new(self.db.pool()).list(&filter).await?;

        Ok(Page {
            items,
            total,
            page,
            size,
        })
    }
}
