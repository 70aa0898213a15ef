//! Administrative bulk moderation
//!
//! Bulk actions mirror the back-office workflow: a moderator selects a
//! set of rows and approves or rejects them in one operation. Rows
//! already in the target state and unknown ids are skipped.

use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::domain::{IngredientStatus, RecipeStatus};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Reject,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ModerationInput {
    #[validate(length(min = 1, message = "At least one id is required"))]
    pub ids: Vec<i64>,
    pub action: ModerationAction,
}

pub struct ModerationService {
    pool: SqlitePool,
}

impl ModerationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Move selected recipes to public/rejected; returns rows changed
    pub async fn moderate_recipes(&self, input: ModerationInput) -> Result<u64, AppError> {
        input.validate()?;

        let status = match input.action {
            ModerationAction::Approve => RecipeStatus::Public,
            ModerationAction::Reject => RecipeStatus::Rejected,
        };

        let placeholders = vec!["?"; input.ids.len()].join(", ");
        let sql = format!(
            "UPDATE recipes SET status = ?, updated_at = datetime('now')
             WHERE id IN ({placeholders}) AND status <> ?"
        );

        let mut query = sqlx::query(&sql).bind(status.as_ref());
        for id in &input.ids {
            query = query.bind(id);
        }
        query = query.bind(status.as_ref());

        let updated = query.execute(&self.pool).await?.rows_affected();

        tracing::info!(updated, status = status.as_ref(), "Bulk recipe moderation");

        Ok(updated)
    }

    /// Move selected ingredients to approved/rejected; returns rows changed
    pub async fn moderate_ingredients(&self, input: ModerationInput) -> Result<u64, AppError> {
        input.validate()?;

        let status = match input.action {
            ModerationAction::Approve => IngredientStatus::Approved,
            ModerationAction::Reject => IngredientStatus::Rejected,
        };

        let placeholders = vec!["?"; input.ids.len()].join(", ");
        let sql = format!(
            "UPDATE ingredients SET status = ?, updated_at = datetime('now')
             WHERE id IN ({placeholders}) AND status <> ?"
        );

        let mut query = sqlx::query(&sql).bind(status.as_ref());
        for id in &input.ids {
            query = query.bind(id);
        }
        query = query.bind(status.as_ref());

        let updated = query.execute(&self.pool).await?.rows_affected();

        tracing::info!(updated, status = status.as_ref(), "Bulk ingredient moderation");

        Ok(updated)
    }
}
