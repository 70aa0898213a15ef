use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::auth::{AuthUser, validate_token};
use crate::error::AppError;
use crate::routes::AppState;

/// Authentication middleware that validates a bearer JWT
///
/// Validates the `Authorization: Bearer` token, verifies the user still
/// exists, and inserts an `AuthUser` extension for downstream handlers.
/// Responds 401 if the token is missing, invalid or references a deleted
/// user.
pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(bearer)) = bearer else {
        return AppError::unauthorized("Authentication required.").into_response();
    };

    let auth_user = match validate_token(bearer.token(), &state.config.jwt.secret) {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Invalid JWT token: {:?}", e);
            return AppError::unauthorized("Invalid or expired token.").into_response();
        }
    };

    // Catch tokens issued for users that have since been deleted
    let user_exists = sqlx::query("SELECT id FROM users WHERE id = ?1")
        .bind(auth_user.user_id)
        .fetch_optional(&state.pool)
        .await;

    match user_exists {
        Ok(Some(_)) => {
            req.extensions_mut().insert(auth_user);
            next.run(req).await
        }
        Ok(None) => {
            tracing::warn!(user_id = auth_user.user_id, "Token for unknown user");
            AppError::unauthorized("Invalid or expired token.").into_response()
        }
        Err(e) => AppError::Database(e).into_response(),
    }
}

/// Caller identity on publicly readable endpoints; `None` for anonymous
/// requests
#[derive(Clone, Debug)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

/// Optional authentication for publicly readable endpoints
///
/// Anonymous requests proceed with an empty `MaybeAuthUser`; a present
/// but invalid token is still rejected rather than silently downgraded to
/// anonymous access.
pub async fn optional_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(bearer)) = bearer else {
        req.extensions_mut().insert(MaybeAuthUser(None));
        return next.run(req).await;
    };

    match validate_token(bearer.token(), &state.config.jwt.secret) {
        Ok(auth_user) => {
            req.extensions_mut().insert(MaybeAuthUser(Some(auth_user)));
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!("Invalid JWT token: {:?}", e);
            AppError::unauthorized("Invalid or expired token.").into_response()
        }
    }
}
