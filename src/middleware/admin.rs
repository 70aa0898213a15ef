//! Admin authorization middleware

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::AuthUser;
use crate::error::AppError;

/// Verify the authenticated user has admin privileges
///
/// Must run after `require_auth`, which inserts the `AuthUser` extension.
pub async fn require_admin(req: Request, next: Next) -> Response {
    let Some(auth_user) = req.extensions().get::<AuthUser>().cloned() else {
        tracing::warn!("Admin middleware reached without authenticated user");
        return AppError::unauthorized("Authentication required.").into_response();
    };

    if !auth_user.is_admin {
        tracing::warn!(
            user_id = auth_user.user_id,
            "Non-admin user attempted to access admin route"
        );
        return AppError::permission_denied("Admin privileges required.").into_response();
    }

    next.run(req).await
}
