//! Administrator model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Enabled/disabled flag shared by administrators, roles and permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
pub enum RecordStatus {
    /// Disabled.
    Disabled = 0,
    /// Enabled.
    #[default]
    Enabled = 1,
}

impl RecordStatus {
    /// Numeric code as used in requests and responses.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Parse a numeric code; only 0 and 1 are valid.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(RecordStatus::Disabled),
            1 => Some(RecordStatus::Enabled),
            _ => None,
        }
    }
}

/// A back-office administrator, unique per (site, username).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Administrator {
    /// Administrator id.
    pub id: i64,
    /// Owning site.
    pub site_id: i64,
    /// Login username.
    pub username: String,
    /// Display nickname.
    pub nickname: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Assigned role.
    pub role_id: i64,
    /// Enabled or disabled.
    pub status: RecordStatus,
    /// Whether a TOTP code is required at login.
    pub two_factor_enabled: bool,
    /// Base32 TOTP secret.
    pub two_factor_secret: Option<String>,
    /// Client IP of the last login.
    pub last_login_ip: Option<String>,
    /// Time of the last login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification or activity time.
    pub updated_at: DateTime<Utc>,
}

impl Administrator {
    /// Whether the account is enabled.
    pub fn is_enabled(&self) -> bool {
        self.status == RecordStatus::Enabled
    }

    /// Whether the account has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Administrator joined with its role name, for listings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminSummary {
    /// Administrator id.
    pub id: i64,
    /// Login username.
    pub username: String,
    /// Display nickname.
    pub nickname: String,
    /// Assigned role.
    pub role_id: i64,
    /// Role name, `None` when the role no longer exists.
    pub role_name: Option<String>,
    /// Enabled or disabled.
    pub status: RecordStatus,
    /// Client IP of the last login.
    pub last_login_ip: Option<String>,
    /// Time of the last login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Data for creating an administrator.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    /// Owning site.
    pub site_id: i64,
    /// Login username.
    pub username: String,
    /// Password hash (already hashed).
    pub password: String,
    /// Display nickname.
    pub nickname: String,
    /// Assigned role.
    pub role_id: i64,
    /// Initial status.
    pub status: RecordStatus,
}

impl NewAdmin {
    /// Create an enabled administrator record.
    pub fn new(
        site_id: i64,
        username: impl Into<String>,
        password: impl Into<String>,
        nickname: impl Into<String>,
        role_id: i64,
    ) -> Self {
        Self {
            site_id,
            username: username.into(),
            password: password.into(),
            nickname: nickname.into(),
            role_id,
            status: RecordStatus::Enabled,
        }
    }

    /// Set the initial status.
    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial update of an administrator. Unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct AdminUpdate {
    /// New password hash.
    pub password: Option<String>,
    /// New nickname.
    pub nickname: Option<String>,
    /// New role.
    pub role_id: Option<i64>,
    /// New status.
    pub status: Option<RecordStatus>,
}

impl AdminUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new password hash.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set new nickname.
    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Set new role.
    pub fn role_id(mut self, role_id: i64) -> Self {
        self.role_id = Some(role_id);
        self
    }

    /// Set new status.
    pub fn status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.password.is_none()
            && self.nickname.is_none()
            && self.role_id.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RecordStatus::Enabled.code(), 1);
        assert_eq!(RecordStatus::Disabled.code(), 0);
        assert_eq!(RecordStatus::from_code(1), Some(RecordStatus::Enabled));
        assert_eq!(RecordStatus::from_code(0), Some(RecordStatus::Disabled));
        assert_eq!(RecordStatus::from_code(2), None);
        assert_eq!(RecordStatus::default(), RecordStatus::Enabled);
    }

    #[test]
    fn test_new_admin_defaults_enabled() {
        let admin = NewAdmin::new(1, "admin1", "hash", "Admin", 1);
        assert_eq!(admin.status, RecordStatus::Enabled);

        let admin = admin.with_status(RecordStatus::Disabled);
        assert_eq!(admin.status, RecordStatus::Disabled);
    }

    #[test]
    fn test_admin_update_builder() {
        assert!(AdminUpdate::new().is_empty());

        let update = AdminUpdate::new().nickname("New").role_id(2);
        assert!(!update.is_empty());
        assert_eq!(update.nickname.as_deref(), Some("New"));
        assert_eq!(update.role_id, Some(2));
        assert!(update.password.is_none());
    }
}
