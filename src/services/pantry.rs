use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::error::{AppError, ConstraintKind, constraint_kind};

#[derive(Debug, FromRow, Serialize)]
pub struct PantryItem {
    pub id: i64,
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub quantity: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PantryWriteInput {
    pub ingredient: i64,
    #[validate(length(max = 50, message = "Must be at most 50 characters"))]
    pub quantity: Option<String>,
}

/// Outcome of a pantry write, distinguishing the response status
pub enum PantryUpsert {
    Created(PantryItem),
    Updated(PantryItem),
}

pub struct PantryService {
    pool: SqlitePool,
}

impl PantryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<PantryItem>, AppError> {
        let items = sqlx::query_as::<_, PantryItem>(
            "SELECT p.id, p.ingredient_id, i.name AS ingredient_name, p.quantity
             FROM pantry_items p
             JOIN ingredients i ON i.id = p.ingredient_id
             WHERE p.user_id = ?1
             ORDER BY i.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Create or update the caller's pantry row for an ingredient
    ///
    /// At most one row ever exists per (user, ingredient): a lost
    /// insert race surfaces as a unique violation and is retried as an
    /// update. A dangling ingredient reference is reported as a
    /// validation error, not a storage fault.
    pub async fn upsert(
        &self,
        user_id: i64,
        input: PantryWriteInput,
    ) -> Result<PantryUpsert, AppError> {
        input.validate()?;

        if self.try_update(user_id, &input).await? {
            return Ok(PantryUpsert::Updated(
                self.fetch_by_pair(user_id, input.ingredient).await?,
            ));
        }

        let inserted = sqlx::query(
            "INSERT INTO pantry_items (user_id, ingredient_id, quantity) VALUES (?1, ?2, ?3)",
        )
        .bind(user_id)
        .bind(input.ingredient)
        .bind(&input.quantity)
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(res) => {
                let item = self.fetch_owned(user_id, res.last_insert_rowid()).await?;
                Ok(PantryUpsert::Created(item))
            }
            Err(e) => match constraint_kind(&e) {
                // A concurrent upsert for the same pair won the insert
                Some(ConstraintKind::Unique) => {
                    self.try_update(user_id, &input).await?;
                    Ok(PantryUpsert::Updated(
                        self.fetch_by_pair(user_id, input.ingredient).await?,
                    ))
                }
                Some(ConstraintKind::ForeignKey) => Err(AppError::validation(
                    "ingredient",
                    "Referenced ingredient does not exist.",
                )),
                None => Err(e.into()),
            },
        }
    }

    pub async fn get(&self, user_id: i64, id: i64) -> Result<PantryItem, AppError> {
        self.fetch_owned(user_id, id).await
    }

    /// Update a pantry row by id, scoped to its owner
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        input: PantryWriteInput,
    ) -> Result<PantryItem, AppError> {
        input.validate()?;

        let result = sqlx::query(
            "UPDATE pantry_items SET ingredient_id = ?1, quantity = ?2
             WHERE id = ?3 AND user_id = ?4",
        )
        .bind(input.ingredient)
        .bind(&input.quantity)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) if res.rows_affected() == 0 => Err(AppError::NotFound("Pantry item")),
            Ok(_) => self.fetch_owned(user_id, id).await,
            Err(e) => match constraint_kind(&e) {
                Some(ConstraintKind::Unique) => Err(AppError::validation(
                    "ingredient",
                    "This ingredient is already in your pantry.",
                )),
                Some(ConstraintKind::ForeignKey) => Err(AppError::validation(
                    "ingredient",
                    "Referenced ingredient does not exist.",
                )),
                None => Err(e.into()),
            },
        }
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM pantry_items WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Pantry item"));
        }

        Ok(())
    }

    async fn try_update(&self, user_id: i64, input: &PantryWriteInput) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE pantry_items SET quantity = ?1 WHERE user_id = ?2 AND ingredient_id = ?3",
        )
        .bind(&input.quantity)
        .bind(user_id)
        .bind(input.ingredient)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch_owned(&self, user_id: i64, id: i64) -> Result<PantryItem, AppError> {
        sqlx::query_as::<_, PantryItem>(
            "SELECT p.id, p.ingredient_id, i.name AS ingredient_name, p.quantity
             FROM pantry_items p
             JOIN ingredients i ON i.id = p.ingredient_id
             WHERE p.id = ?1 AND p.user_id = ?2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Pantry item"))
    }

    async fn fetch_by_pair(&self, user_id: i64, ingredient_id: i64) -> Result<PantryItem, AppError> {
        sqlx::query_as::<_, PantryItem>(
            "SELECT p.id, p.ingredient_id, i.name AS ingredient_name, p.quantity
             FROM pantry_items p
             JOIN ingredients i ON i.id = p.ingredient_id
             WHERE p.user_id = ?1 AND p.ingredient_id = ?2",
        )
        .bind(user_id)
        .bind(ingredient_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Pantry item"))
    }
}
