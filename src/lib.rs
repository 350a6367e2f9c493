//! Back-office administration service.
//!
//! Administrator login with stateless signed tokens, per-request identity
//! re-validation, the permission menu tree, administrator management and an
//! audit trail, served as a JSON API.

pub mod admin;
pub mod auth;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{hash_password, verify_password, AdminIdentity, PasswordError, SessionError};
pub use config::Config;
pub use db::Database;
pub use error::{BackofficeError, Result};
