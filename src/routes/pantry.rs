//! Pantry route handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::services::pantry::{PantryService, PantryUpsert, PantryWriteInput};

/// GET /api/pantry
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let items = PantryService::new(state.pool.clone())
        .list(auth.user_id)
        .await?;
    Ok(Json(items))
}

/// POST /api/pantry - upsert by (user, ingredient)
///
/// Responds 201 when a new row was created and 200 when an existing
/// row's quantity was updated.
pub async fn upsert(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<PantryWriteInput>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = PantryService::new(state.pool.clone())
        .upsert(auth.user_id, input)
        .await?;

    Ok(match outcome {
        PantryUpsert::Created(item) => (StatusCode::CREATED, Json(item)),
        PantryUpsert::Updated(item) => (StatusCode::OK, Json(item)),
    })
}

/// GET /api/pantry/{id}
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let item = PantryService::new(state.pool.clone())
        .get(auth.user_id, id)
        .await?;
    Ok(Json(item))
}

/// PUT /api/pantry/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(input): Json<PantryWriteInput>,
) -> Result<impl IntoResponse, AppError> {
    let item = PantryService::new(state.pool.clone())
        .update(auth.user_id, id, input)
        .await?;
    Ok(Json(item))
}

/// DELETE /api/pantry/{id}
pub async fn destroy(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    PantryService::new(state.pool.clone())
        .delete(auth.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
