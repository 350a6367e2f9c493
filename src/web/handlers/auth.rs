//! Session handlers: login, token refresh, profile, menus, logout and
//! password change.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::auth::LoginAttempt;
use crate::web::dto::{
    ActionResponse, ApiResponse, ChangePasswordRequest, InfoResponse, LoginRequest, LoginResponse,
    MenuResponse, MenusResponse, TokenResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthAdmin, ClientIp};

use super::AppState;

/// POST /api/admin/login - Administrator login.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Malformed username or password"),
        (status = 401, description = "Invalid credentials or missing verification code"),
        (status = 403, description = "Account disabled")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let attempt = LoginAttempt {
        username: req.username,
        password: req.password,
        code: req.code,
        site_id: req.site_id,
        ip,
    };

    let outcome = state.sessions.login(attempt).await?;
    Ok(Json(ApiResponse::with_message("login successful", outcome.into())))
}

/// GET /api/admin/refresh-token - Issue a fresh token.
#[utoipa::path(
    get,
    path = "/api/admin/refresh-token",
    tag = "session",
    responses(
        (status = 200, description = "New token", body = TokenResponse),
        (status = 401, description = "Not logged in or session expired"),
        (status = 403, description = "Account disabled")
    ),
    security(("bearer_auth" = []))
)]
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
    ClientIp(ip): ClientIp,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let token = state.sessions.refresh(&identity, &ip).await?;
    Ok(Json(ApiResponse::new(TokenResponse { token })))
}

/// GET /api/admin/info - Current administrator profile and menus.
#[utoipa::path(
    get,
    path = "/api/admin/info",
    tag = "session",
    responses(
        (status = 200, description = "Profile", body = InfoResponse),
        (status = 401, description = "Not logged in or session expired"),
        (status = 403, description = "Account disabled")
    ),
    security(("bearer_auth" = []))
)]
pub async fn info(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
) -> Result<Json<ApiResponse<InfoResponse>>, ApiError> {
    let info = state.sessions.info(&identity).await?;
    Ok(Json(ApiResponse::new(info.into())))
}

/// GET /api/admin/menus - Menu forest of the current administrator.
#[utoipa::path(
    get,
    path = "/api/admin/menus",
    tag = "session",
    responses(
        (status = 200, description = "Menu forest", body = MenusResponse),
        (status = 401, description = "Not logged in or session expired"),
        (status = 403, description = "Account disabled")
    ),
    security(("bearer_auth" = []))
)]
pub async fn menus(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
) -> Result<Json<ApiResponse<MenusResponse>>, ApiError> {
    let menus = state.sessions.menus(&identity).await?;
    let menus = menus.into_iter().map(MenuResponse::from).collect();
    Ok(Json(ApiResponse::new(MenusResponse { menus })))
}

/// POST /api/admin/logout - End the session.
///
/// Tokens are stateless, so this only leaves an audit entry; the client
/// discards its token.
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    tag = "session",
    responses(
        (status = 200, description = "Logged out", body = ActionResponse),
        (status = 401, description = "Not logged in or session expired")
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
    ClientIp(ip): ClientIp,
) -> Json<ApiResponse<ActionResponse>> {
    let outcome = state.sessions.logout(&identity, &ip).await;
    Json(ApiResponse::with_message(outcome.message.clone(), outcome.into()))
}

/// POST /api/admin/change-password - Change own password.
#[utoipa::path(
    post,
    path = "/api/admin/change-password",
    tag = "session",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ActionResponse),
        (status = 400, description = "Validation failed or old password incorrect"),
        (status = 401, description = "Not logged in or session expired"),
        (status = 403, description = "Account disabled")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
    ClientIp(ip): ClientIp,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<ActionResponse>>, ApiError> {
    let outcome = state
        .sessions
        .change_password(&identity, &req.old_password, &req.new_password, &ip)
        .await?;
    Ok(Json(ApiResponse::with_message(outcome.message.clone(), outcome.into())))
}
