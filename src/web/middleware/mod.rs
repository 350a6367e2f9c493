//! Middleware and request extractors for the Web API.

pub mod auth;
pub mod client_ip;
pub mod cors;

pub use auth::{bearer_token, jwt_auth, AuthAdmin};
pub use client_ip::{resolve_client_ip, ClientIp, ProxyHeaders};
pub use cors::create_cors_layer;
