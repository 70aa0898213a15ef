//! Suggestion listing route handler

use axum::{Extension, Json, extract::{Query, State}, response::IntoResponse};
use serde::Deserialize;

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::services::suggestions::{SuggestionMode, SuggestionService};

#[derive(Deserialize)]
pub struct SuggestionQuery {
    mode: Option<String>,
}

/// GET /api/suggestions?mode=strict|loose
///
/// Mode defaults to loose when absent.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<SuggestionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mode = match query.mode.as_deref() {
        None => SuggestionMode::default(),
        Some(raw) => raw
            .parse::<SuggestionMode>()
            .map_err(|_| AppError::validation("mode", "Must be either 'strict' or 'loose'."))?,
    };

    let suggestions = SuggestionService::new(state.pool.clone())
        .suggest(auth.user_id, mode)
        .await?;

    Ok(Json(suggestions))
}
