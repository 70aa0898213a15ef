//! Favorite recipe route handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::services::favorites::{FavoriteService, FavoriteToggle};

/// POST /api/recipes/{id}/favorite
///
/// 201 when added, 200 when the recipe was already a favorite.
pub async fn add(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = FavoriteService::new(state.pool.clone())
        .add(auth.user_id, id)
        .await?;

    Ok(match outcome {
        FavoriteToggle::Added => (
            StatusCode::CREATED,
            Json(json!({"message": "Recipe added to favorites."})),
        ),
        FavoriteToggle::AlreadyFavorite => (
            StatusCode::OK,
            Json(json!({"message": "Recipe is already in your favorites."})),
        ),
    })
}

/// DELETE /api/recipes/{id}/favorite
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    FavoriteService::new(state.pool.clone())
        .remove(auth.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/favorites
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let recipes = FavoriteService::new(state.pool.clone())
        .list(auth.user_id)
        .await?;
    Ok(Json(recipes))
}
