//! Administration handlers: accounts, audit log and roles.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::admin::{AccountService, AuditLogService, RoleService};
use crate::web::dto::{
    AdminLogPage, AdminLogResponse, AdminPage, AdminResponse, ApiResponse, CreateAdminRequest,
    ListAdminsQuery, ListLogsQuery, PageResponse, RoleResponse, UpdateAdminRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthAdmin, ClientIp};

use super::AppState;

/// GET /api/admin/admins - List administrators of the caller's site.
#[utoipa::path(
    get,
    path = "/api/admin/admins",
    tag = "admins",
    params(ListAdminsQuery),
    responses(
        (status = 200, description = "One page of administrators", body = AdminPage),
        (status = 400, description = "Invalid status filter"),
        (status = 401, description = "Not logged in or session expired")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_admins(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
    Query(query): Query<ListAdminsQuery>,
) -> Result<Json<ApiResponse<PageResponse<AdminResponse>>>, ApiError> {
    let page = AccountService::new(&state.db).list(&identity, query.into()).await?;
    Ok(Json(ApiResponse::new(page.into())))
}

/// POST /api/admin/admins - Create an administrator.
#[utoipa::path(
    post,
    path = "/api/admin/admins",
    tag = "admins",
    request_body = CreateAdminRequest,
    responses(
        (status = 200, description = "Administrator created", body = AdminResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not logged in or session expired"),
        (status = 409, description = "Username already taken")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
    ClientIp(ip): ClientIp,
    ValidatedJson(req): ValidatedJson<CreateAdminRequest>,
) -> Result<Json<ApiResponse<AdminResponse>>, ApiError> {
    let created = AccountService::new(&state.db)
        .create(&identity, req.into(), &ip)
        .await?;
    Ok(Json(ApiResponse::with_message("administrator created", created.into())))
}

/// PUT /api/admin/admins/:id - Update an administrator.
#[utoipa::path(
    put,
    path = "/api/admin/admins/{id}",
    tag = "admins",
    params(("id" = i64, Path, description = "Administrator id")),
    request_body = UpdateAdminRequest,
    responses(
        (status = 200, description = "Administrator updated", body = AdminResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not logged in or session expired"),
        (status = 404, description = "Administrator not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_admin(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
    ClientIp(ip): ClientIp,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateAdminRequest>,
) -> Result<Json<ApiResponse<AdminResponse>>, ApiError> {
    let updated = AccountService::new(&state.db)
        .update(&identity, req.into_update(id), &ip)
        .await?;
    Ok(Json(ApiResponse::with_message("administrator updated", updated.into())))
}

/// DELETE /api/admin/admins/:id - Soft-delete an administrator.
#[utoipa::path(
    delete,
    path = "/api/admin/admins/{id}",
    tag = "admins",
    params(("id" = i64, Path, description = "Administrator id")),
    responses(
        (status = 200, description = "Administrator deleted"),
        (status = 400, description = "Invalid id or deleting yourself"),
        (status = 401, description = "Not logged in or session expired"),
        (status = 404, description = "Administrator not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_admin(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
    ClientIp(ip): ClientIp,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    AccountService::new(&state.db).delete(&identity, id, &ip).await?;
    Ok(Json(ApiResponse::with_message("administrator deleted", ())))
}

/// GET /api/admin/logs - Audit trail of the caller's site.
#[utoipa::path(
    get,
    path = "/api/admin/logs",
    tag = "admins",
    params(ListLogsQuery),
    responses(
        (status = 200, description = "One page of audit entries", body = AdminLogPage),
        (status = 400, description = "Invalid time format"),
        (status = 401, description = "Not logged in or session expired")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
    Query(query): Query<ListLogsQuery>,
) -> Result<Json<ApiResponse<PageResponse<AdminLogResponse>>>, ApiError> {
    let page = AuditLogService::new(&state.db).list(&identity, query.into()).await?;
    Ok(Json(ApiResponse::new(page.into())))
}

/// GET /api/admin/roles - Enabled roles of the caller's site.
#[utoipa::path(
    get,
    path = "/api/admin/roles",
    tag = "admins",
    responses(
        (status = 200, description = "Role options", body = Vec<RoleResponse>),
        (status = 401, description = "Not logged in or session expired")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
) -> Result<Json<ApiResponse<Vec<RoleResponse>>>, ApiError> {
    let roles = RoleService::new(&state.db).list(&identity).await?;
    Ok(Json(ApiResponse::new(
        roles.into_iter().map(RoleResponse::from).collect(),
    )))
}
