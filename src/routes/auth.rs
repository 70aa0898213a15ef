//! Registration, login and current-user route handlers

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::services::users::{LoginInput, RegisterInput, UserService};

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserService::new(state.pool.clone()).register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse, AppError> {
    let token = UserService::new(state.pool.clone())
        .authenticate(input, &state.config.jwt)
        .await?;
    Ok(Json(json!({ "token": token })))
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserService::new(state.pool.clone())
        .profile(auth.user_id)
        .await?;
    Ok(Json(user))
}
