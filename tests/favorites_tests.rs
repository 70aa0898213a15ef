//! Favorite toggling and listing

mod common;

use axum::http::StatusCode;

use common::{bearer, seed_recipe, seed_user, send_json, setup_app};

#[tokio::test]
async fn test_favorite_toggle_add_is_idempotent_but_reports_state() {
    let (app, pool) = setup_app().await;

    let author = seed_user(&pool, "author").await;
    let fan = seed_user(&pool, "fan").await;
    let recipe_id = seed_recipe(&pool, author, "Public soup", "public").await;

    let uri = format!("/api/recipes/{recipe_id}/favorite");
    let token = bearer(fan);

    let (status, _) = send_json(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);

    // Adding again is not an error, just already present
    let (status, _) = send_json(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM favorite_recipes WHERE user_id = ?1 AND recipe_id = ?2",
    )
    .bind(fan)
    .bind(recipe_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_favorite_unknown_recipe_is_not_found() {
    let (app, pool) = setup_app().await;

    let fan = seed_user(&pool, "fan").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/recipes/424242/favorite",
        Some(&bearer(fan)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_listing_is_caller_scoped() {
    let (app, pool) = setup_app().await;

    let author = seed_user(&pool, "author").await;
    let fan = seed_user(&pool, "fan").await;
    let other = seed_user(&pool, "other").await;
    let recipe_id = seed_recipe(&pool, author, "Public soup", "public").await;
    common::seed_favorite(&pool, fan, recipe_id).await;

    let (status, body) = send_json(&app, "GET", "/api/favorites", Some(&bearer(fan)), None).await;
    assert_eq!(status, StatusCode::OK);
    let favorites = body.as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["title"], "Public soup");

    let (_, body) = send_json(&app, "GET", "/api/favorites", Some(&bearer(other)), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unfavorite_removes_and_then_404s() {
    let (app, pool) = setup_app().await;

    let author = seed_user(&pool, "author").await;
    let fan = seed_user(&pool, "fan").await;
    let recipe_id = seed_recipe(&pool, author, "Public soup", "public").await;
    common::seed_favorite(&pool, fan, recipe_id).await;

    let uri = format!("/api/recipes/{recipe_id}/favorite");
    let token = bearer(fan);

    let (status, _) = send_json(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
