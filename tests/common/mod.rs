//! Shared helpers for integration tests: in-memory database setup, row
//! fixtures and JSON request plumbing.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use cookbox::config::{Config, DatabaseConfig, JwtConfig, ObservabilityConfig, ServerConfig};
use cookbox::{AppState, router};

pub const TEST_JWT_SECRET: &str = "test_secret_key_minimum_32_characters_long";

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiration_days: 7,
        },
        observability: ObservabilityConfig::default(),
    }
}

/// In-memory database with migrations applied, plus the app router
pub async fn setup_app() -> (Router, SqlitePool) {
    let pool = cookbox::create_pool("sqlite::memory:", 1)
        .await
        .expect("Failed to create test database");
    cookbox::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState {
        pool: pool.clone(),
        config: test_config(),
    };

    (router(state), pool)
}

/// Bearer token for a regular user
pub fn bearer(user_id: i64) -> String {
    cookbox::auth::generate_token(user_id, false, TEST_JWT_SECRET, 3600).unwrap()
}

/// Bearer token carrying the admin claim
pub fn bearer_admin(user_id: i64) -> String {
    cookbox::auth::generate_token(user_id, true, TEST_JWT_SECRET, 3600).unwrap()
}

/// Send a JSON request through the router and decode the JSON response
/// body (Null when the body is empty, e.g. 204 responses)
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

// ---- row fixtures ----------------------------------------------------

pub async fn seed_user(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query("INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, 'x')")
        .bind(username)
        .bind(format!("{username}@example.com"))
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

pub async fn seed_admin(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query(
        "INSERT INTO users (username, email, password_hash, is_admin) VALUES (?1, ?2, 'x', 1)",
    )
    .bind(username)
    .bind(format!("{username}@example.com"))
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

pub async fn seed_ingredient(
    pool: &SqlitePool,
    name: &str,
    category: &str,
    status: &str,
) -> i64 {
    sqlx::query("INSERT INTO ingredients (name, category, status) VALUES (?1, ?2, ?3)")
        .bind(name)
        .bind(category)
        .bind(status)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

pub async fn seed_recipe(pool: &SqlitePool, author_id: i64, title: &str, status: &str) -> i64 {
    sqlx::query(
        "INSERT INTO recipes (title, instructions, difficulty, author_id, status)
         VALUES (?1, 'Cook everything.', 'easy', ?2, ?3)",
    )
    .bind(title)
    .bind(author_id)
    .bind(status)
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

pub async fn link_ingredient(pool: &SqlitePool, recipe_id: i64, ingredient_id: i64) {
    sqlx::query(
        "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity) VALUES (?1, ?2, '1')",
    )
    .bind(recipe_id)
    .bind(ingredient_id)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_pantry_item(pool: &SqlitePool, user_id: i64, ingredient_id: i64) {
    sqlx::query("INSERT INTO pantry_items (user_id, ingredient_id, quantity) VALUES (?1, ?2, '1')")
        .bind(user_id)
        .bind(ingredient_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn seed_favorite(pool: &SqlitePool, user_id: i64, recipe_id: i64) {
    sqlx::query("INSERT INTO favorite_recipes (user_id, recipe_id) VALUES (?1, ?2)")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await
        .unwrap();
}
