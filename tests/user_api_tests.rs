//! HTTP tests for `/users/` and `/users/{id}/`

mod common;

use axum::http::StatusCode;
use common::{ADMIN, ALICE, spawn_app, spawn_app_with, test_config};
use serde_json::{Value, json};

#[tokio::test]
async fn test_user_list_is_public_and_shows_owned_products() {
    let app = spawn_app().await;
    let alice = app.token(ALICE).await;
    app.create_category(&alice, "book").await;
    app.create_product(&alice, json!({ "category": 1, "name": "Rust" }))
        .await;

    let response = app.server.get("/users/").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(
        body,
        json!([
            { "id": 1, "username": "admin", "is_staff": true, "products": [] },
            { "id": 2, "username": "alice", "is_staff": false, "products": [1] },
            { "id": 3, "username": "bob", "is_staff": false, "products": [] }
        ])
    );
}

#[tokio::test]
async fn test_user_detail_requires_staff() {
    let app = spawn_app().await;
    let alice = app.token(ALICE).await;
    let admin = app.token(ADMIN).await;

    app.server
        .get("/users/2/")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .get("/users/2/")
        .authorization_bearer(&alice)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .get("/users/2/")
        .authorization_bearer(&admin)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["username"], "alice");

    app.server
        .get("/users/99/")
        .authorization_bearer(&admin)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_staff_can_create_users() {
    let app = spawn_app().await;
    let alice = app.token(ALICE).await;
    let admin = app.token(ADMIN).await;
    let body = json!({ "username": "carol", "password": "carol-pw" });

    app.server
        .post("/users/")
        .json(&body)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .post("/users/")
        .authorization_bearer(&alice)
        .json(&body)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .post("/users/")
        .authorization_bearer(&admin)
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "id": 4, "username": "carol", "is_staff": false, "products": [] })
    );

    // the new account can log in
    app.token(("carol", "carol-pw")).await;
}

#[tokio::test]
async fn test_create_user_validation() {
    let app = spawn_app().await;
    let admin = app.token(ADMIN).await;

    let duplicate = app
        .server
        .post("/users/")
        .authorization_bearer(&admin)
        .json(&json!({ "username": "alice" }))
        .await;
    duplicate.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        duplicate.json::<Value>()["details"]["fields"][0]["message"],
        "A user with that username already exists."
    );

    app.server
        .post("/users/")
        .authorization_bearer(&admin)
        .json(&json!({ "username": "bad name" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_without_password_cannot_log_in() {
    let app = spawn_app().await;
    let admin = app.token(ADMIN).await;

    app.server
        .post("/users/")
        .authorization_bearer(&admin)
        .json(&json!({ "username": "dave" }))
        .await
        .assert_status(StatusCode::CREATED);

    app.server
        .post("/api/token/")
        .json(&json!({ "username": "dave", "password": "anything" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_restricted_user_listing() {
    let mut config = test_config();
    config.access.restrict_user_listing = true;
    let app = spawn_app_with(config).await;
    let alice = app.token(ALICE).await;
    let admin = app.token(ADMIN).await;

    app.server
        .get("/users/")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get("/users/")
        .authorization_bearer(&alice)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.server
        .get("/users/")
        .authorization_bearer(&admin)
        .await
        .assert_status_ok();
}
