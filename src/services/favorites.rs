use sqlx::SqlitePool;

use crate::error::{AppError, ConstraintKind, constraint_kind};
use crate::services::recipes::RecipeSummary;

/// Outcome of adding a favorite, distinguishing the response status
pub enum FavoriteToggle {
    Added,
    AlreadyFavorite,
}

pub struct FavoriteService {
    pool: SqlitePool,
}

impl FavoriteService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn add(&self, user_id: i64, recipe_id: i64) -> Result<FavoriteToggle, AppError> {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM recipes WHERE id = ?1")
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound("Recipe"));
        }

        let result = sqlx::query(
            "INSERT INTO favorite_recipes (user_id, recipe_id) VALUES (?1, ?2)",
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(FavoriteToggle::Added),
            Err(e) if constraint_kind(&e) == Some(ConstraintKind::Unique) => {
                Ok(FavoriteToggle::AlreadyFavorite)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove(&self, user_id: i64, recipe_id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM favorite_recipes WHERE user_id = ?1 AND recipe_id = ?2",
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Favorite"));
        }

        Ok(())
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<RecipeSummary>, AppError> {
        let recipes = sqlx::query_as::<_, RecipeSummary>(
            "SELECT r.id, r.title, r.description, r.difficulty, r.cooking_time_minutes,
                    r.instructions
             FROM favorite_recipes f
             JOIN recipes r ON r.id = f.recipe_id
             WHERE f.user_id = ?1
             ORDER BY r.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }
}
