//! Shopping list route handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::services::shopping::{
    CreateShoppingItemInput, ShoppingListService, UpdateShoppingItemInput,
};

/// GET /api/shopping-list
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let items = ShoppingListService::new(state.pool.clone())
        .list(auth.user_id)
        .await?;
    Ok(Json(items))
}

/// POST /api/shopping-list
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<CreateShoppingItemInput>,
) -> Result<impl IntoResponse, AppError> {
    let item = ShoppingListService::new(state.pool.clone())
        .create(auth.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/shopping-list/{id}
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let item = ShoppingListService::new(state.pool.clone())
        .get(auth.user_id, id)
        .await?;
    Ok(Json(item))
}

/// PUT /api/shopping-list/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateShoppingItemInput>,
) -> Result<impl IntoResponse, AppError> {
    let item = ShoppingListService::new(state.pool.clone())
        .update(auth.user_id, id, input)
        .await?;
    Ok(Json(item))
}

/// DELETE /api/shopping-list/{id}
pub async fn destroy(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    ShoppingListService::new(state.pool.clone())
        .delete(auth.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
