//! Shared helpers for the Web API integration tests.

#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use backoffice::db::{AdminRepository, Administrator, NewAdmin, RecordStatus};
use backoffice::web::handlers::AppState;
use backoffice::web::router::create_app;
use backoffice::{hash_password, Config, Database};

/// Signing secret used by every test server.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// Push endpoint configured for the test server.
pub const TEST_ENDPOINT: &str = "ws://push.test:2346";

/// Create a test configuration.
pub fn create_test_config(secret: &str) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.auth.jwt_secret = secret.to_string();
    config.socket.host = "ws://push.test".to_string();
    config.socket.port = "2346".to_string();
    config
}

/// Create a test server over an in-memory database.
pub async fn create_test_server() -> (TestServer, Database) {
    create_test_server_with_secret(TEST_SECRET).await
}

/// Create a test server with a specific signing secret.
pub async fn create_test_server_with_secret(secret: &str) -> (TestServer, Database) {
    create_test_server_with_config(create_test_config(secret)).await
}

/// Create a test server from a prepared configuration.
pub async fn create_test_server_with_config(config: Config) -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let app_state = Arc::new(AppState::new(db.clone(), &config));
    let router = create_app(app_state, &config.server.cors_origins);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, db)
}

/// Insert an administrator into site 1 with the seeded role.
pub async fn seed_admin(
    db: &Database,
    username: &str,
    password: &str,
    status: RecordStatus,
) -> Administrator {
    let hash = hash_password(password).expect("hash");
    AdminRepository::new(db.pool())
        .create(&NewAdmin::new(1, username, hash, format!("{} nick", username), 1).with_status(status))
        .await
        .expect("Failed to seed administrator")
}

/// Log in and return the raw response body.
pub async fn login(server: &TestServer, username: &str, password: &str) -> Value {
    server
        .post("/api/admin/login")
        .json(&json!({
            "username": username,
            "password": password
        }))
        .await
        .json::<Value>()
}

/// Log in and return the session token.
pub async fn login_token(server: &TestServer, username: &str, password: &str) -> String {
    let body = login(server, username, password).await;
    body["data"]["token"]
        .as_str()
        .expect("No token in login response")
        .to_string()
}

/// Seed `admin1`/`secret1` and return its token.
pub async fn admin_token(server: &TestServer, db: &Database) -> String {
    seed_admin(db, "admin1", "secret1", RecordStatus::Enabled).await;
    login_token(server, "admin1", "secret1").await
}

