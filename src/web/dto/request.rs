//! Request DTOs for Web API.
//!
//! Only structural limits live here; the domain rules (length ranges, allowed
//! characters, status codes) are checked by the services so every entry point
//! reports them the same way.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::admin::{CreateAdmin, ListAdmins, ListLogs, UpdateAdmin};

/// Upper bound on any free-text field.
const MAX_FIELD_LEN: usize = 64;

/// Login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(max = 64, message = "username too long"))]
    pub username: String,
    /// Password.
    #[validate(length(max = 64, message = "password too long"))]
    pub password: String,
    /// TOTP code, required when two-factor is enabled on the account.
    #[serde(default)]
    pub code: Option<String>,
    /// Site; the configured default is used when absent.
    #[serde(default)]
    pub site_id: Option<i64>,
}

/// Password change request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[serde(default)]
    #[validate(length(max = 64, message = "password too long"))]
    pub old_password: String,
    /// New password.
    #[serde(default)]
    #[validate(length(max = 64, message = "password too long"))]
    pub new_password: String,
}

/// Administrator creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAdminRequest {
    /// Login name.
    #[validate(length(max = 64, message = "username too long"))]
    pub username: String,
    /// Initial password.
    #[validate(length(max = 64, message = "password too long"))]
    pub password: String,
    /// Display name.
    #[validate(length(max = 64, message = "nickname too long"))]
    pub nickname: String,
    /// Role id.
    pub role_id: i64,
    /// 1 enabled, 0 disabled; enabled when absent.
    #[serde(default)]
    pub status: Option<i32>,
}

impl From<CreateAdminRequest> for CreateAdmin {
    fn from(req: CreateAdminRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            nickname: req.nickname,
            role_id: req.role_id,
            status: req.status,
        }
    }
}

/// Administrator update request. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAdminRequest {
    /// New password.
    #[serde(default)]
    #[validate(length(max = 64, message = "password too long"))]
    pub password: Option<String>,
    /// New display name.
    #[serde(default)]
    #[validate(length(max = 64, message = "nickname too long"))]
    pub nickname: Option<String>,
    /// New role id.
    #[serde(default)]
    pub role_id: Option<i64>,
    /// New status.
    #[serde(default)]
    pub status: Option<i32>,
}

impl UpdateAdminRequest {
    /// Combine with the path id into a service input.
    pub fn into_update(self, id: i64) -> UpdateAdmin {
        UpdateAdmin {
            id,
            password: self.password,
            nickname: self.nickname,
            role_id: self.role_id,
            status: self.status,
        }
    }
}

/// Administrator listing query.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAdminsQuery {
    /// Username substring.
    pub username: Option<String>,
    /// Status filter.
    pub status: Option<i32>,
    /// 1-based page, default 1.
    pub page: Option<i64>,
    /// Page size, default 10.
    pub size: Option<i64>,
}

impl From<ListAdminsQuery> for ListAdmins {
    fn from(q: ListAdminsQuery) -> Self {
        Self {
            username: q.username.map(|u| truncate(&u)),
            status: q.status,
            page: q.page,
            size: q.size,
        }
    }
}

/// Audit log listing query.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLogsQuery {
    /// Exact username.
    pub username: Option<String>,
    /// Range start, `YYYY-MM-DD HH:MM:SS`, RFC 3339 or a bare date.
    pub start: Option<String>,
    /// Range end, same formats as `start`.
    pub end: Option<String>,
    /// 1-based page, default 1.
    pub page: Option<i64>,
    /// Page size, default 50.
    pub size: Option<i64>,
}

impl From<ListLogsQuery> for ListLogs {
    fn from(q: ListLogsQuery) -> Self {
        Self {
            username: q.username.map(|u| truncate(&u)),
            start: q.start,
            end: q.end,
            page: q.page,
            size: q.size,
        }
    }
}

fn truncate(value: &str) -> String {
    value.chars().take(MAX_FIELD_LEN).collect()
}
