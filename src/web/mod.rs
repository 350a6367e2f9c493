//! Web API module.
//!
//! JSON over HTTP for the admin frontend: session endpoints under
//! `/api/admin`, administrator management, a health check and Swagger UI.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_app, create_router};
pub use server::WebServer;
