use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::error::{AppError, ConstraintKind, constraint_kind};

#[derive(Debug, FromRow, Serialize)]
pub struct ShoppingListItem {
    pub id: i64,
    pub ingredient: i64,
    pub ingredient_name: String,
    pub is_checked: bool,
    pub quantity: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateShoppingItemInput {
    pub ingredient: i64,
    #[validate(length(max = 100, message = "Must be at most 100 characters"))]
    pub quantity: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateShoppingItemInput {
    pub ingredient: Option<i64>,
    #[validate(length(max = 100, message = "Must be at most 100 characters"))]
    pub quantity: Option<String>,
    pub is_checked: Option<bool>,
}

pub struct ShoppingListService {
    pool: SqlitePool,
}

impl ShoppingListService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<ShoppingListItem>, AppError> {
        let items = sqlx::query_as::<_, ShoppingListItem>(
            "SELECT s.id, s.ingredient_id AS ingredient, i.name AS ingredient_name,
                    s.is_checked, s.quantity
             FROM shopping_list_items s
             JOIN ingredients i ON i.id = s.ingredient_id
             WHERE s.user_id = ?1
             ORDER BY s.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// New items start unchecked
    pub async fn create(
        &self,
        user_id: i64,
        input: CreateShoppingItemInput,
    ) -> Result<ShoppingListItem, AppError> {
        input.validate()?;

        let result = sqlx::query(
            "INSERT INTO shopping_list_items (user_id, ingredient_id, quantity, is_checked)
             VALUES (?1, ?2, ?3, 0)",
        )
        .bind(user_id)
        .bind(input.ingredient)
        .bind(&input.quantity)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => self.fetch_owned(user_id, res.last_insert_rowid()).await,
            Err(e) if constraint_kind(&e) == Some(ConstraintKind::ForeignKey) => Err(
                AppError::validation("ingredient", "Referenced ingredient does not exist."),
            ),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, user_id: i64, id: i64) -> Result<ShoppingListItem, AppError> {
        self.fetch_owned(user_id, id).await
    }

    /// Partial update; absent fields keep their stored values
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        input: UpdateShoppingItemInput,
    ) -> Result<ShoppingListItem, AppError> {
        input.validate()?;

        let result = sqlx::query(
            "UPDATE shopping_list_items
             SET ingredient_id = COALESCE(?1, ingredient_id),
                 quantity = COALESCE(?2, quantity),
                 is_checked = COALESCE(?3, is_checked)
             WHERE id = ?4 AND user_id = ?5",
        )
        .bind(input.ingredient)
        .bind(&input.quantity)
        .bind(input.is_checked)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) if res.rows_affected() == 0 => Err(AppError::NotFound("Shopping list item")),
            Ok(_) => self.fetch_owned(user_id, id).await,
            Err(e) if constraint_kind(&e) == Some(ConstraintKind::ForeignKey) => Err(
                AppError::validation("ingredient", "Referenced ingredient does not exist."),
            ),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM shopping_list_items WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Shopping list item"));
        }

        Ok(())
    }

    async fn fetch_owned(&self, user_id: i64, id: i64) -> Result<ShoppingListItem, AppError> {
        sqlx::query_as::<_, ShoppingListItem>(
            "SELECT s.id, s.ingredient_id AS ingredient, i.name AS ingredient_name,
                    s.is_checked, s.quantity
             FROM shopping_list_items s
             JOIN ingredients i ON i.id = s.ingredient_id
             WHERE s.id = ?1 AND s.user_id = ?2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Shopping list item"))
    }
}
