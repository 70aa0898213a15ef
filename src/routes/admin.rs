//! Admin bulk moderation route handlers
//!
//! Routes here are gated by both the auth and admin middleware.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use super::AppState;
use crate::error::AppError;
use crate::services::moderation::{ModerationInput, ModerationService};

/// POST /api/admin/recipes/moderate
pub async fn moderate_recipes(
    State(state): State<AppState>,
    Json(input): Json<ModerationInput>,
) -> Result<impl IntoResponse, AppError> {
    let updated = ModerationService::new(state.pool.clone())
        .moderate_recipes(input)
        .await?;
    Ok(Json(json!({ "updated": updated })))
}

/// POST /api/admin/ingredients/moderate
pub async fn moderate_ingredients(
    State(state): State<AppState>,
    Json(input): Json<ModerationInput>,
) -> Result<impl IntoResponse, AppError> {
    let updated = ModerationService::new(state.pool.clone())
        .moderate_ingredients(input)
        .await?;
    Ok(Json(json!({ "updated": updated })))
}
