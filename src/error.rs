use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(HashMap<String, String>),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation error for a single field
    pub fn validation(field: &str, message: &str) -> Self {
        let mut details = HashMap::new();
        details.insert(field.to_string(), message.to_string());
        AppError::Validation(details)
    }

    pub fn unauthorized(message: &str) -> Self {
        AppError::Unauthorized(message.to_string())
    }

    pub fn permission_denied(message: &str) -> Self {
        AppError::PermissionDenied(message.to_string())
    }

    pub fn conflict(message: &str) -> Self {
        AppError::Conflict(message.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let message = errors
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string());
                (field.to_string(), message)
            })
            .collect();
        AppError::Validation(details)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message, details) = match self {
            AppError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                "ValidationFailed",
                "Invalid input provided.".to_string(),
                Some(details),
            ),
            AppError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized", message, None)
            }
            AppError::PermissionDenied(message) => {
                (StatusCode::FORBIDDEN, "PermissionDenied", message, None)
            }
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "NotFound",
                format!("{what} not found."),
                None,
            ),
            AppError::Conflict(message) => (StatusCode::CONFLICT, "Conflict", message, None),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An unexpected error occurred. Please try again later.".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An unexpected error occurred. Please try again later.".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": error,
            "message": message,
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}

/// Kind of storage-constraint violation attributable to caller input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
}

/// Classify a storage error as a caller-attributable constraint violation
///
/// Returns `None` for anything that should propagate as an opaque server
/// fault.
pub fn constraint_kind(err: &sqlx::Error) -> Option<ConstraintKind> {
    let db_err = err.as_database_error()?;
    match db_err.kind() {
        sqlx::error::ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
        sqlx::error::ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
        _ => None,
    }
}
