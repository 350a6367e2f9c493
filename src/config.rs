//! Configuration module for the back-office service.

use serde::Deserialize;
use std::path::Path;

use crate::{BackofficeError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means permissive (development).
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Take the client address from `X-Forwarded-For` / `X-Real-IP`.
    /// Only enable when a reverse proxy sets these headers.
    #[serde(default = "default_trust_proxy_headers")]
    pub trust_proxy_headers: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_trust_proxy_headers() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            trust_proxy_headers: default_trust_proxy_headers(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/backoffice.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Token signing secret. Token issuance fails while this is empty.
    #[serde(default)]
    pub jwt_secret: String,
    /// Site used when a login request does not name one.
    #[serde(default = "default_site_id")]
    pub site_id: i64,
    /// Avatar returned by the info endpoint.
    #[serde(default = "default_avatar")]
    pub default_avatar: String,
}

fn default_site_id() -> i64 {
    1
}

fn default_avatar() -> String {
    "https://wpimg.wallstcn.com/577965b9-bb9e-4e02-9f0c-095b41417191".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            site_id: default_site_id(),
            default_avatar: default_avatar(),
        }
    }
}

/// Auxiliary push-socket endpoint handed to clients on login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocketConfig {
    /// Socket host (may include a scheme).
    #[serde(default)]
    pub host: String,
    /// Socket port, kept as text so an unset port stays distinguishable.
    #[serde(default)]
    pub port: String,
}

impl SocketConfig {
    /// Endpoint address as `host[:port]`; empty when nothing is configured.
    pub fn endpoint(&self) -> String {
        if self.port.is_empty() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/backoffice.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// First administrator created at startup when the site has none.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapConfig {
    /// Username of the initial administrator. Empty disables bootstrapping.
    #[serde(default)]
    pub username: String,
    /// Plaintext password of the initial administrator.
    #[serde(default)]
    pub password: String,
    /// Display nickname.
    #[serde(default)]
    pub nickname: String,
}

impl BootstrapConfig {
    /// Whether a bootstrap administrator is configured.
    pub fn is_enabled(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Auxiliary socket endpoint.
    #[serde(default)]
    pub socket: SocketConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Initial administrator provisioning.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BackofficeError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BackofficeError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides.
    ///
    /// Supported environment variables:
    /// - `BACKOFFICE_JWT_SECRET`: token signing secret
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt_secret) = std::env::var("BACKOFFICE_JWT_SECRET") {
            if !jwt_secret.is_empty() {
                self.auth.jwt_secret = jwt_secret;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// An empty signing secret is not rejected here; the token service refuses
    /// to issue tokens instead, so the rest of the API stays reachable.
    pub fn validate(&self) -> Result<()> {
        if self.auth.site_id <= 0 {
            return Err(BackofficeError::Config(
                "auth.site_id must be a positive number".to_string(),
            ));
        }
        if self.bootstrap.is_enabled() && self.bootstrap.nickname.is_empty() {
            return Err(BackofficeError::Config(
                "bootstrap.nickname must be set when bootstrap.username is set".to_string(),
            ));
        }
        Ok(())
    }
}
