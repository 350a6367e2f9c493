//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::dto::ApiResponse;
use super::handlers::{
    change_password, create_admin, delete_admin, info, list_admins, list_logs, list_roles, login,
    logout, menus, refresh_token, update_admin, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, ProxyHeaders};
use super::openapi::ApiDoc;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let session_routes = Router::new()
        .route("/login", post(login))
        .route("/refresh-token", get(refresh_token))
        .route("/info", get(info))
        .route("/menus", get(menus))
        .route("/logout", post(logout))
        .route("/change-password", post(change_password));

    let management_routes = Router::new()
        .route("/admins", get(list_admins).post(create_admin))
        .route("/admins/:id", put(update_admin).delete(delete_admin))
        .route("/logs", get(list_logs))
        .route("/roles", get(list_roles));

    let admin_routes = Router::new()
        .merge(session_routes)
        .merge(management_routes);

    let tokens = app_state.tokens();
    let proxy_headers = ProxyHeaders(app_state.trust_proxy_headers);

    Router::new()
        .nest("/api/admin", admin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(Extension(proxy_headers))
                .layer(middleware::from_fn(move |req, next| {
                    let tokens = tokens.clone();
                    jwt_auth(tokens, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> Json<ApiResponse<()>> {
    Json(ApiResponse::with_message("ok", ()))
}

/// Swagger UI serving the generated OpenAPI document.
pub fn create_swagger_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Everything the server mounts.
pub fn create_app(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    create_router(app_state, cors_origins)
        .merge(create_health_router())
        .merge(create_swagger_router())
}
