use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::auth::{generate_token, hash_password, verify_password};
use crate::config::JwtConfig;
use crate::error::{AppError, ConstraintKind, constraint_kind};

#[derive(Debug, FromRow, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 3, max = 32, message = "Must be between 3 and 32 characters"))]
    pub username: String,
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1, message = "Required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Required"))]
    pub password: String,
}

pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<UserProfile, AppError> {
        input.validate()?;

        let password_hash = hash_password(&input.password)?;

        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&password_hash)
        .execute(&self.pool)
        .await;

        let user_id = match result {
            Ok(res) => res.last_insert_rowid(),
            Err(e) if constraint_kind(&e) == Some(ConstraintKind::Unique) => {
                // The violation message names the offending column
                let field = if e.to_string().contains("users.email") {
                    ("email", "This email is already registered.")
                } else {
                    ("username", "This username is already taken.")
                };
                return Err(AppError::validation(field.0, field.1));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id, username = %input.username, "User registered");

        self.profile(user_id).await
    }

    /// Verify credentials and issue a bearer token
    pub async fn authenticate(&self, input: LoginInput, jwt: &JwtConfig) -> Result<String, AppError> {
        input.validate()?;

        let row: Option<(i64, String, bool)> = sqlx::query_as(
            "SELECT id, password_hash, is_admin FROM users WHERE username = ?1",
        )
        .bind(&input.username)
        .fetch_optional(&self.pool)
        .await?;

        let Some((user_id, password_hash, is_admin)) = row else {
            return Err(AppError::unauthorized(
                "Invalid username or password. Please try again.",
            ));
        };

        if !verify_password(&input.password, &password_hash)? {
            return Err(AppError::unauthorized(
                "Invalid username or password. Please try again.",
            ));
        }

        let token = generate_token(user_id, is_admin, &jwt.secret, jwt.lifetime_seconds())?;

        tracing::info!(user_id, "User logged in");

        Ok(token)
    }

    pub async fn profile(&self, user_id: i64) -> Result<UserProfile, AppError> {
        sqlx::query_as::<_, UserProfile>("SELECT id, username, email FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("User"))
    }
}
