use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::domain::{Difficulty, RecipeStatus};
use crate::error::{AppError, ConstraintKind, constraint_kind};

/// Listing shape for publicly visible recipes
#[derive(Debug, FromRow, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub cooking_time_minutes: Option<i64>,
    pub instructions: String,
}

/// Listing shape for the author's own recipes, which also exposes the
/// moderation status
#[derive(Debug, FromRow, Serialize)]
pub struct OwnRecipe {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub cooking_time_minutes: Option<i64>,
    pub instructions: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub difficulty: String,
    pub cooking_time_minutes: Option<i64>,
    pub author_name: String,
    pub ingredients: Vec<RecipeIngredientDetail>,
}

/// An ingredient line within a recipe detail; `id` and `name` are the
/// ingredient's, not the link row's
#[derive(Debug, FromRow, Serialize)]
pub struct RecipeIngredientDetail {
    pub id: i64,
    pub name: String,
    pub quantity: String,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecipeInput {
    #[validate(length(min = 1, max = 255, message = "Must be between 1 and 255 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Required"))]
    pub instructions: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[validate(range(min = 0, message = "Must not be negative"))]
    pub cooking_time_minutes: Option<i64>,
    #[validate(nested)]
    pub ingredients: Vec<RecipeIngredientInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecipeIngredientInput {
    pub ingredient: i64,
    #[validate(length(min = 1, max = 100, message = "Must be between 1 and 100 characters"))]
    pub quantity: String,
    pub unit: Option<String>,
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: i64,
    title: String,
    description: Option<String>,
    instructions: String,
    difficulty: String,
    cooking_time_minutes: Option<i64>,
    author_id: i64,
    author_name: String,
    status: String,
}

pub struct RecipeService {
    pool: SqlitePool,
}

impl RecipeService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Public recipes, plus the viewer's own regardless of status
    pub async fn list_visible(&self, viewer: Option<i64>) -> Result<Vec<RecipeSummary>, AppError> {
        let recipes = match viewer {
            Some(user_id) => {
                sqlx::query_as::<_, RecipeSummary>(
                    "SELECT id, title, description, difficulty, cooking_time_minutes, instructions
                     FROM recipes
                     WHERE status = ?1 OR author_id = ?2
                     ORDER BY id",
                )
                .bind(RecipeStatus::Public.as_ref())
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, RecipeSummary>(
                    "SELECT id, title, description, difficulty, cooking_time_minutes, instructions
                     FROM recipes
                     WHERE status = ?1
                     ORDER BY id",
                )
                .bind(RecipeStatus::Public.as_ref())
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(recipes)
    }

    /// The caller's recipes in every status, newest first
    pub async fn list_own(&self, author_id: i64) -> Result<Vec<OwnRecipe>, AppError> {
        let recipes = sqlx::query_as::<_, OwnRecipe>(
            "SELECT id, title, description, difficulty, cooking_time_minutes, instructions, status
             FROM recipes
             WHERE author_id = ?1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }

    /// Create a recipe with its ingredient links; it starts private
    pub async fn create(&self, author_id: i64, input: RecipeInput) -> Result<RecipeDetail, AppError> {
        input.validate()?;

        let mut tx = self.pool.begin().await?;

        let recipe_id = sqlx::query(
            "INSERT INTO recipes
                 (title, description, instructions, difficulty, cooking_time_minutes, author_id, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.instructions)
        .bind(input.difficulty.as_ref())
        .bind(input.cooking_time_minutes)
        .bind(author_id)
        .bind(RecipeStatus::Private.as_ref())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        insert_ingredient_links(&mut tx, recipe_id, &input.ingredients).await?;

        tx.commit().await?;

        tracing::info!(recipe_id, author_id, "Recipe created");

        self.fetch_detail(recipe_id).await
    }

    /// Fetch a recipe the viewer is allowed to see
    ///
    /// Non-visible recipes are reported as not found rather than
    /// revealing their existence.
    pub async fn get_visible(&self, viewer: Option<i64>, id: i64) -> Result<RecipeDetail, AppError> {
        let row = self.fetch_row(id).await?;

        let visible = row.status == RecipeStatus::Public.as_ref() || viewer == Some(row.author_id);
        if !visible {
            return Err(AppError::NotFound("Recipe"));
        }

        self.detail_from_row(row).await
    }

    /// Replace a recipe's fields and ingredient links; author only
    pub async fn update(
        &self,
        caller: i64,
        id: i64,
        input: RecipeInput,
    ) -> Result<RecipeDetail, AppError> {
        input.validate()?;
        self.check_author(caller, id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE recipes
             SET title = ?1, description = ?2, instructions = ?3, difficulty = ?4,
                 cooking_time_minutes = ?5, updated_at = datetime('now')
             WHERE id = ?6",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.instructions)
        .bind(input.difficulty.as_ref())
        .bind(input.cooking_time_minutes)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_ingredient_links(&mut tx, id, &input.ingredients).await?;

        tx.commit().await?;

        self.fetch_detail(id).await
    }

    /// Delete a recipe; author only
    pub async fn delete(&self, caller: i64, id: i64) -> Result<(), AppError> {
        self.check_author(caller, id).await?;

        sqlx::query("DELETE FROM recipes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(recipe_id = id, "Recipe deleted");

        Ok(())
    }

    /// Request the private -> pending_approval moderation transition
    pub async fn submit_for_review(&self, caller: i64, id: i64) -> Result<(), AppError> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT author_id, status FROM recipes WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some((author_id, status)) = row else {
            return Err(AppError::NotFound("Recipe"));
        };

        if author_id != caller {
            return Err(AppError::permission_denied(
                "You do not have permission to perform this action.",
            ));
        }

        if status != RecipeStatus::Private.as_ref() {
            return Err(AppError::conflict(
                "This recipe has already been submitted or published.",
            ));
        }

        sqlx::query(
            "UPDATE recipes SET status = ?1, updated_at = datetime('now') WHERE id = ?2",
        )
        .bind(RecipeStatus::PendingApproval.as_ref())
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::info!(recipe_id = id, "Recipe submitted for review");

        Ok(())
    }

    async fn check_author(&self, caller: i64, id: i64) -> Result<(), AppError> {
        let author_id: Option<(i64,)> =
            sqlx::query_as("SELECT author_id FROM recipes WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match author_id {
            None => Err(AppError::NotFound("Recipe")),
            Some((author_id,)) if author_id != caller => Err(AppError::permission_denied(
                "You do not have permission to modify this recipe.",
            )),
            Some(_) => Ok(()),
        }
    }

    async fn fetch_row(&self, id: i64) -> Result<RecipeRow, AppError> {
        sqlx::query_as::<_, RecipeRow>(
            "SELECT r.id, r.title, r.description, r.instructions, r.difficulty,
                    r.cooking_time_minutes, r.author_id, u.username AS author_name, r.status
             FROM recipes r
             JOIN users u ON u.id = r.author_id
             WHERE r.id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Recipe"))
    }

    async fn fetch_detail(&self, id: i64) -> Result<RecipeDetail, AppError> {
        let row = self.fetch_row(id).await?;
        self.detail_from_row(row).await
    }

    async fn detail_from_row(&self, row: RecipeRow) -> Result<RecipeDetail, AppError> {
        let ingredients = sqlx::query_as::<_, RecipeIngredientDetail>(
            "SELECT i.id, i.name, ri.quantity, ri.unit
             FROM recipe_ingredients ri
             JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE ri.recipe_id = ?1
             ORDER BY ri.id",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(RecipeDetail {
            id: row.id,
            title: row.title,
            description: row.description,
            instructions: row.instructions,
            difficulty: row.difficulty,
            cooking_time_minutes: row.cooking_time_minutes,
            author_name: row.author_name,
            ingredients,
        })
    }
}

/// Insert a recipe's ingredient links, translating constraint violations
/// into caller-facing validation errors
async fn insert_ingredient_links(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    recipe_id: i64,
    links: &[RecipeIngredientInput],
) -> Result<(), AppError> {
    for link in links {
        let result = sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, unit)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(recipe_id)
        .bind(link.ingredient)
        .bind(&link.quantity)
        .bind(&link.unit)
        .execute(&mut **tx)
        .await;

        if let Err(e) = result {
            return Err(match constraint_kind(&e) {
                Some(ConstraintKind::Unique) => AppError::validation(
                    "ingredients",
                    "The same ingredient is listed more than once.",
                ),
                Some(ConstraintKind::ForeignKey) => {
                    AppError::validation("ingredients", "Referenced ingredient does not exist.")
                }
                None => e.into(),
            });
        }
    }

    Ok(())
}
