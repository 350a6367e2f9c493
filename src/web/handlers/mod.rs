//! API handlers and shared application state.

pub mod admin;
pub mod auth;

pub use admin::*;
pub use auth::*;

use std::sync::Arc;

use crate::auth::{SessionService, SessionSettings, TokenService};
use crate::{Config, Database};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Session orchestrator backed by the database.
    pub sessions: SessionService<Database>,
    /// Whether forwarding headers name the client address.
    pub trust_proxy_headers: bool,
}

impl AppState {
    /// Build the state from an open database and the loaded configuration.
    pub fn new(db: Database, config: &Config) -> Self {
        let tokens = Arc::new(TokenService::new(&config.auth.jwt_secret));
        let sessions = SessionService::new(
            Arc::new(db.clone()),
            tokens,
            SessionSettings::from_config(config),
        );
        Self {
            db,
            sessions,
            trust_proxy_headers: config.server.trust_proxy_headers,
        }
    }

    /// Token service used for issuing and validating bearer tokens.
    pub fn tokens(&self) -> Arc<TokenService> {
        Arc::clone(self.sessions.tokens())
    }
}
