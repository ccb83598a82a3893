//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use axum_test::TestServer;
use catalog::config::{AppConfig, BootstrapUser, PasswordHashingConfig};
use catalog::server::ServerBuilder;
use catalog::storage::CatalogStore;
use serde_json::{Value, json};

pub const ADMIN: (&str, &str) = ("admin", "admin-pw");
pub const ALICE: (&str, &str) = ("alice", "alice-pw");
pub const BOB: (&str, &str) = ("bob", "bob-pw");

pub struct TestApp {
    pub server: TestServer,
    pub store: CatalogStore,
}

fn account((username, password): (&str, &str), is_staff: bool) -> BootstrapUser {
    BootstrapUser {
        username: username.to_string(),
        password: password.to_string(),
        is_staff,
    }
}

/// Configuration with cheap password hashing and three seeded accounts
///
/// Accounts are seeded in order, so admin is user 1, alice user 2 and bob
/// user 3.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.auth.password_hashing = PasswordHashingConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    };
    config.bootstrap_users = vec![
        account(ADMIN, true),
        account(ALICE, false),
        account(BOB, false),
    ];
    config
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

pub async fn spawn_app_with(config: AppConfig) -> TestApp {
    let store = CatalogStore::in_memory();
    let router = ServerBuilder::new(config)
        .with_store(store.clone())
        .with_catalog_entities()
        .build()
        .await
        .expect("failed to build app");

    TestApp {
        server: TestServer::try_new(router).expect("failed to start test server"),
        store,
    }
}

impl TestApp {
    /// Obtain an access token through `/api/token/`
    pub async fn token(&self, (username, password): (&str, &str)) -> String {
        let response = self
            .server
            .post("/api/token/")
            .json(&json!({ "username": username, "password": password }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        body["access"]
            .as_str()
            .expect("token response carries an access token")
            .to_string()
    }

    pub async fn create_category(&self, token: &str, name: &str) -> Value {
        let response = self
            .server
            .post("/categories/")
            .authorization_bearer(token)
            .json(&json!({ "name": name }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    pub async fn create_product(&self, token: &str, body: Value) -> Value {
        let response = self
            .server
            .post("/products/")
            .authorization_bearer(token)
            .json(&body)
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }
}
