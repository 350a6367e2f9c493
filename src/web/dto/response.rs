//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::admin::Page;
use crate::auth::{ActionOutcome, AdminInfo, LoginOutcome, MenuNode};
use crate::datetime::{format_display, format_optional};
use crate::db::{AdminLog, AdminSummary, Administrator, Role};

// ============================================================================
// Envelope
// ============================================================================

/// Success envelope: `{"code": 0, "message": "...", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always 0 on success.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Payload.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self::with_message("ok", data)
    }

    /// Create a response with a specific message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: 0,
            message: message.into(),
            data,
        }
    }
}

/// One page of results.
#[derive(Debug, Serialize, ToSchema)]
#[aliases(AdminPage = PageResponse<AdminResponse>, AdminLogPage = PageResponse<AdminLogResponse>)]
pub struct PageResponse<T: Serialize> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total matching items.
    pub total: i64,
    /// 1-based page number.
    pub page: i64,
    /// Page size.
    pub size: i64,
}

impl<S, T: Serialize + From<S>> From<Page<S>> for PageResponse<T> {
    fn from(page: Page<S>) -> Self {
        Self {
            items: page.items.into_iter().map(T::from).collect(),
            total: page.total,
            page: page.page,
            size: page.size,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Session token for the `Authorization: Bearer` header.
    pub token: String,
    /// Push-socket endpoint; empty when not configured.
    pub endpoint: String,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: outcome.token,
            endpoint: outcome.endpoint,
        }
    }
}

/// Refreshed token.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// New session token.
    pub token: String,
}

/// A menu tree node.
#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    /// Permission id.
    pub id: i64,
    /// Parent id, 0 for roots.
    pub parent_id: i64,
    /// Display name.
    pub name: String,
    /// 1 menu, 2 operation.
    #[serde(rename = "type")]
    pub kind: i32,
    /// Frontend route.
    pub path: String,
    /// Backend route.
    pub backend_url: String,
    /// Icon name.
    pub icon: String,
    /// Sort key.
    pub sort: i64,
    /// Expanded by default.
    pub open: bool,
    /// Checked in tree widgets.
    pub checked: bool,
    /// Child nodes.
    pub children: Vec<MenuResponse>,
}

impl From<MenuNode> for MenuResponse {
    fn from(node: MenuNode) -> Self {
        Self {
            id: node.id,
            parent_id: node.parent_id,
            name: node.name,
            kind: node.kind as i32,
            path: node.path,
            backend_url: node.backend_url,
            icon: node.icon,
            sort: node.sort,
            open: node.open,
            checked: node.checked,
            children: node.children.into_iter().map(MenuResponse::from).collect(),
        }
    }
}

/// Profile and menus of the current administrator.
#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    /// Role names.
    pub roles: Vec<String>,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub avatar: String,
    /// Short introduction.
    pub introduction: String,
    /// Menu forest.
    pub menus: Vec<MenuResponse>,
}

impl From<AdminInfo> for InfoResponse {
    fn from(info: AdminInfo) -> Self {
        Self {
            roles: info.roles,
            name: info.name,
            avatar: info.avatar,
            introduction: info.introduction,
            menus: info.menus.into_iter().map(MenuResponse::from).collect(),
        }
    }
}

/// Menu forest only.
#[derive(Debug, Serialize, ToSchema)]
pub struct MenusResponse {
    /// Menu forest.
    pub menus: Vec<MenuResponse>,
}

/// Result of logout and password change.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Whether the action succeeded.
    pub success: bool,
    /// Confirmation text.
    pub message: String,
}

impl From<ActionOutcome> for ActionResponse {
    fn from(outcome: ActionOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
        }
    }
}

// ============================================================================
// Administration
// ============================================================================

/// Administrator as shown in listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminResponse {
    /// Id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Display name.
    pub nickname: String,
    /// Role id.
    pub role_id: i64,
    /// Role name, when the role still exists.
    pub role_name: Option<String>,
    /// 1 enabled, 0 disabled.
    pub status: i32,
    /// Last login address.
    pub last_login_ip: String,
    /// Last login time, empty when never.
    pub last_login_at: String,
    /// Creation time.
    pub created_at: String,
}

impl From<AdminSummary> for AdminResponse {
    fn from(admin: AdminSummary) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            nickname: admin.nickname,
            role_id: admin.role_id,
            role_name: admin.role_name,
            status: admin.status.code(),
            last_login_ip: admin.last_login_ip.unwrap_or_default(),
            last_login_at: format_optional(admin.last_login_at.as_ref()),
            created_at: format_display(&admin.created_at),
        }
    }
}

impl From<Administrator> for AdminResponse {
    fn from(admin: Administrator) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            nickname: admin.nickname,
            role_id: admin.role_id,
            role_name: None,
            status: admin.status.code(),
            last_login_ip: admin.last_login_ip.unwrap_or_default(),
            last_login_at: format_optional(admin.last_login_at.as_ref()),
            created_at: format_display(&admin.created_at),
        }
    }
}

/// Audit trail entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminLogResponse {
    /// Id.
    pub id: i64,
    /// Acting administrator id.
    pub admin_id: i64,
    /// Acting administrator username.
    pub username: String,
    /// Client address.
    pub ip: String,
    /// What happened.
    pub remark: String,
    /// When it happened.
    pub created_at: String,
}

impl From<AdminLog> for AdminLogResponse {
    fn from(log: AdminLog) -> Self {
        Self {
            id: log.id,
            admin_id: log.admin_id,
            username: log.admin_username,
            ip: log.ip,
            remark: log.remark,
            created_at: format_display(&log.created_at),
        }
    }
}

/// Role option.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
    /// Id.
    pub id: i64,
    /// Name.
    pub name: String,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
        }
    }
}
