//! Registration, login and current-user endpoint tests

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{send_json, setup_app};

#[tokio::test]
async fn test_register_creates_user() {
    let (app, _pool) = setup_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "correct-horse-battery"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body["id"].is_i64());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_rejects_duplicate_username() {
    let (app, _pool) = setup_app().await;

    let payload = json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "correct-horse-battery"
    });
    let (status, _) = send_json(&app, "POST", "/api/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "correct-horse-battery"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationFailed");
    assert!(body["details"]["username"].is_string());
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let (app, _pool) = setup_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": "al",
            "email": "not-an-email",
            "password": "short"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationFailed");
    assert!(body["details"]["username"].is_string());
    assert!(body["details"]["email"].is_string());
    assert!(body["details"]["password"].is_string());
}

#[tokio::test]
async fn test_login_issues_usable_token() {
    let (app, _pool) = setup_app().await;

    send_json(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "correct-horse-battery"
        })),
    )
    .await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"username": "bob", "password": "correct-horse-battery"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send_json(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "bob");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (app, _pool) = setup_app().await;

    send_json(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "correct-horse-battery"
        })),
    )
    .await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"username": "bob", "password": "wrong-password"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_login_rejects_unknown_user() {
    let (app, _pool) = setup_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"username": "ghost", "password": "whatever-works"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_token() {
    let (app, _pool) = setup_app().await;

    let (status, _) = send_json(&app, "GET", "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(&app, "GET", "/api/users/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_user_is_rejected() {
    let (app, pool) = setup_app().await;

    let user_id = common::seed_user(&pool, "gone").await;
    let token = common::bearer(user_id);

    sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = send_json(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
