//! Recipe CRUD and moderation-request route handlers

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
use crate::middleware::MaybeAuthUser;
use crate::services::recipes::{RecipeInput, RecipeService};

/// GET /api/recipes - public recipes, plus the caller's own when
/// authenticated
pub async fn list(
    State(state): State<AppState>,
    Extension(MaybeAuthUser(auth)): Extension<MaybeAuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = auth.map(|auth| auth.user_id);
    let recipes = RecipeService::new(state.pool.clone())
        .list_visible(viewer)
        .await?;
    Ok(Json(recipes))
}

/// POST /api/recipes - create a recipe; it starts private
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<RecipeInput>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = RecipeService::new(state.pool.clone())
        .create(auth.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// GET /api/recipes/my-recipes
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let recipes = RecipeService::new(state.pool.clone())
        .list_own(auth.user_id)
        .await?;
    Ok(Json(recipes))
}

/// GET /api/recipes/{id}
pub async fn get_one(
    State(state): State<AppState>,
    Extension(MaybeAuthUser(auth)): Extension<MaybeAuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = auth.map(|auth| auth.user_id);
    let recipe = RecipeService::new(state.pool.clone())
        .get_visible(viewer, id)
        .await?;
    Ok(Json(recipe))
}

/// PUT /api/recipes/{id} - author only
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(input): Json<RecipeInput>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = RecipeService::new(state.pool.clone())
        .update(auth.user_id, id, input)
        .await?;
    Ok(Json(recipe))
}

/// DELETE /api/recipes/{id} - author only
pub async fn destroy(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    RecipeService::new(state.pool.clone())
        .delete(auth.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/{id}/submit-review
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    RecipeService::new(state.pool.clone())
        .submit_for_review(auth.user_id, id)
        .await?;
    Ok(Json(json!({
        "message": "Recipe submitted for review."
    })))
}
