use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::domain::{IngredientCategory, IngredientStatus};
use crate::error::{AppError, ConstraintKind, constraint_kind};

#[derive(Debug, FromRow, Serialize)]
pub struct IngredientSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContributeIngredientInput {
    #[validate(length(min = 1, max = 255, message = "Must be between 1 and 255 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub category: IngredientCategory,
}

pub struct IngredientService {
    pool: SqlitePool,
}

impl IngredientService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Only approved ingredients are visible in listings
    pub async fn list_approved(&self) -> Result<Vec<IngredientSummary>, AppError> {
        let ingredients = sqlx::query_as::<_, IngredientSummary>(
            "SELECT id, name, description FROM ingredients WHERE status = ?1 ORDER BY name",
        )
        .bind(IngredientStatus::Approved.as_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(ingredients)
    }

    /// Submit a new ingredient for moderation; it starts pending approval
    pub async fn contribute(
        &self,
        submitted_by: i64,
        input: ContributeIngredientInput,
    ) -> Result<IngredientSummary, AppError> {
        input.validate()?;

        let result = sqlx::query(
            "INSERT INTO ingredients (name, description, category, submitted_by, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.category.as_ref())
        .bind(submitted_by)
        .bind(IngredientStatus::PendingApproval.as_ref())
        .execute(&self.pool)
        .await;

        let id = match result {
            Ok(res) => res.last_insert_rowid(),
            Err(e) if constraint_kind(&e) == Some(ConstraintKind::Unique) => {
                return Err(AppError::validation(
                    "name",
                    "An ingredient with this name already exists.",
                ));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(ingredient_id = id, submitted_by, "Ingredient submitted for review");

        let ingredient = sqlx::query_as::<_, IngredientSummary>(
            "SELECT id, name, description FROM ingredients WHERE id = ?1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ingredient)
    }
}
