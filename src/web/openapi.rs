//! OpenAPI document for the admin API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{
    ActionResponse, AdminLogPage, AdminLogResponse, AdminPage, AdminResponse, ChangePasswordRequest,
    CreateAdminRequest, InfoResponse, LoginRequest, LoginResponse, MenuResponse, MenusResponse,
    RoleResponse, TokenResponse, UpdateAdminRequest,
};
use super::handlers;

/// API documentation root.
#[derive(OpenApi)]
#[openapi(
    info(title = "backoffice", description = "Back-office administration API"),
    paths(
        handlers::auth::login,
        handlers::auth::refresh_token,
        handlers::auth::info,
        handlers::auth::menus,
        handlers::auth::logout,
        handlers::auth::change_password,
        handlers::admin::list_admins,
        handlers::admin::create_admin,
        handlers::admin::update_admin,
        handlers::admin::delete_admin,
        handlers::admin::list_logs,
        handlers::admin::list_roles,
    ),
    components(schemas(
        LoginRequest,
        LoginResponse,
        TokenResponse,
        InfoResponse,
        MenusResponse,
        MenuResponse,
        ActionResponse,
        ChangePasswordRequest,
        CreateAdminRequest,
        UpdateAdminRequest,
        AdminResponse,
        AdminPage,
        AdminLogResponse,
        AdminLogPage,
        RoleResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "session", description = "Login and the current administrator"),
        (name = "admins", description = "Administrator accounts, audit log and roles")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
