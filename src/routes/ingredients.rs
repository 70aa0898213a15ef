//! Ingredient listing and contribution route handlers

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::services::ingredients::{ContributeIngredientInput, IngredientService};

/// GET /api/ingredients - approved ingredients only
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let ingredients = IngredientService::new(state.pool.clone())
        .list_approved()
        .await?;
    Ok(Json(ingredients))
}

/// POST /api/ingredients - contribute a new ingredient for moderation
pub async fn contribute(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<ContributeIngredientInput>,
) -> Result<impl IntoResponse, AppError> {
    let ingredient = IngredientService::new(state.pool.clone())
        .contribute(auth.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}
