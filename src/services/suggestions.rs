//! Recipe suggestion ranking
//!
//! The score is computed in process over materialized (recipe,
//! ingredient-link) rows rather than in SQL, so the arithmetic is unit
//! testable without a database.
//!
//! Staple ingredients are assumed always available and never enter the
//! match/missing counts. Missing ingredients are penalized by category
//! weight (a missing protein costs 100, a missing spice 10), and recipes
//! from authors the user has favorited receive a flat bonus.

use serde::Serialize;
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use std::collections::{HashMap, HashSet};
use strum::EnumString;

use crate::domain::{RecipeStatus, category_is_staple, category_missing_weight};
use crate::error::AppError;

/// Points per pantry-covered non-staple ingredient
const MATCH_WEIGHT: i64 = 20;
/// Flat bonus when the recipe's author is among the user's favorites
const AUTHOR_BONUS: i64 = 50;
/// Loose mode tolerates at most this many missing non-staple ingredients
const LOOSE_MAX_MISSING: i64 = 2;

#[derive(EnumString, Debug, Default, Clone, Copy, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum SuggestionMode {
    /// Every non-staple ingredient must be in the pantry
    Strict,
    /// Up to two missing non-staple ingredients, non-negative score
    #[default]
    Loose,
}

/// A recipe eligible for ranking, with its materialized ingredient links
#[derive(Debug)]
pub struct CandidateRecipe {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub cooking_time_minutes: Option<i64>,
    pub instructions: String,
    pub ingredients: Vec<CandidateIngredient>,
}

#[derive(Debug)]
pub struct CandidateIngredient {
    pub ingredient_id: i64,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct ScoredRecipe {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub cooking_time_minutes: Option<i64>,
    pub instructions: String,
    pub match_count: i64,
    pub missing_count: i64,
    pub score: i64,
}

/// Rank candidate recipes against a pantry
///
/// An empty pantry yields no suggestions regardless of mode. Results are
/// ordered by score descending, ties broken by recipe id ascending so
/// that repeated calls are reproducible.
pub fn rank_recipes(
    pantry: &HashSet<i64>,
    favorite_authors: &HashSet<i64>,
    candidates: Vec<CandidateRecipe>,
    mode: SuggestionMode,
) -> Vec<ScoredRecipe> {
    if pantry.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredRecipe> = candidates
        .into_iter()
        .filter_map(|recipe| {
            let mut match_count = 0;
            let mut missing_count = 0;
            let mut missing_penalty = 0;

            for link in &recipe.ingredients {
                if category_is_staple(&link.category) {
                    continue;
                }
                if pantry.contains(&link.ingredient_id) {
                    match_count += 1;
                } else {
                    missing_count += 1;
                    missing_penalty += category_missing_weight(&link.category);
                }
            }

            let author_bonus = if favorite_authors.contains(&recipe.author_id) {
                AUTHOR_BONUS
            } else {
                0
            };
            let score = match_count * MATCH_WEIGHT - missing_penalty + author_bonus;

            let keep = match mode {
                SuggestionMode::Strict => missing_count == 0,
                SuggestionMode::Loose => missing_count <= LOOSE_MAX_MISSING && score >= 0,
            };
            if !keep {
                return None;
            }

            Some(ScoredRecipe {
                id: recipe.id,
                title: recipe.title,
                description: recipe.description,
                difficulty: recipe.difficulty,
                cooking_time_minutes: recipe.cooking_time_minutes,
                instructions: recipe.instructions,
                match_count,
                missing_count,
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));

    scored
}

#[derive(Debug, FromRow)]
struct CandidateRow {
    id: i64,
    author_id: i64,
    title: String,
    description: Option<String>,
    difficulty: String,
    cooking_time_minutes: Option<i64>,
    instructions: String,
}

#[derive(Debug, FromRow)]
struct LinkRow {
    recipe_id: i64,
    ingredient_id: i64,
    category: String,
}

pub struct SuggestionService {
    pool: SqlitePool,
}

impl SuggestionService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Suggestions for a user: public recipes plus their own, ranked
    /// against their pantry
    pub async fn suggest(
        &self,
        user_id: i64,
        mode: SuggestionMode,
    ) -> Result<Vec<ScoredRecipe>, AppError> {
        let pantry: HashSet<i64> =
            sqlx::query_scalar("SELECT ingredient_id FROM pantry_items WHERE user_id = ?1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .collect();

        if pantry.is_empty() {
            return Ok(Vec::new());
        }

        let favorite_authors: HashSet<i64> = sqlx::query_scalar(
            "SELECT DISTINCT r.author_id
             FROM favorite_recipes f
             JOIN recipes r ON r.id = f.recipe_id
             WHERE f.user_id = ?1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .collect();

        let candidates = sqlx::query_as::<_, CandidateRow>(
            "SELECT id, author_id, title, description, difficulty, cooking_time_minutes, instructions
             FROM recipes
             WHERE status = ?1 OR author_id = ?2",
        )
        .bind(RecipeStatus::Public.as_ref())
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let links = sqlx::query_as::<_, LinkRow>(
            "SELECT ri.recipe_id, ri.ingredient_id, i.category
             FROM recipe_ingredients ri
             JOIN ingredients i ON i.id = ri.ingredient_id
             JOIN recipes r ON r.id = ri.recipe_id
             WHERE r.status = ?1 OR r.author_id = ?2",
        )
        .bind(RecipeStatus::Public.as_ref())
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_recipe: HashMap<i64, Vec<CandidateIngredient>> = HashMap::new();
        for link in links {
            by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(CandidateIngredient {
                    ingredient_id: link.ingredient_id,
                    category: link.category,
                });
        }

        let candidates = candidates
            .into_iter()
            .map(|row| CandidateRecipe {
                ingredients: by_recipe.remove(&row.id).unwrap_or_default(),
                id: row.id,
                author_id: row.author_id,
                title: row.title,
                description: row.description,
                difficulty: row.difficulty,
                cooking_time_minutes: row.cooking_time_minutes,
                instructions: row.instructions,
            })
            .collect();

        Ok(rank_recipes(&pantry, &favorite_authors, candidates, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: i64, author_id: i64, ingredients: Vec<(i64, &str)>) -> CandidateRecipe {
        CandidateRecipe {
            id,
            author_id,
            title: format!("Recipe {id}"),
            description: None,
            difficulty: "easy".to_string(),
            cooking_time_minutes: Some(30),
            instructions: "Cook it.".to_string(),
            ingredients: ingredients
                .into_iter()
                .map(|(ingredient_id, category)| CandidateIngredient {
                    ingredient_id,
                    category: category.to_string(),
                })
                .collect(),
        }
    }

    fn ids(set: &[i64]) -> HashSet<i64> {
        set.iter().copied().collect()
    }

    #[test]
    fn test_empty_pantry_yields_nothing() {
        let candidates = vec![recipe(1, 1, vec![(10, "protein")])];
        let ranked = rank_recipes(
            &HashSet::new(),
            &HashSet::new(),
            candidates,
            SuggestionMode::Loose,
        );
        assert!(ranked.is_empty());

        let candidates = vec![recipe(1, 1, vec![(10, "protein")])];
        let ranked = rank_recipes(
            &HashSet::new(),
            &HashSet::new(),
            candidates,
            SuggestionMode::Strict,
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_strict_mode_requires_full_coverage() {
        let candidates = vec![
            recipe(1, 1, vec![(10, "protein"), (11, "vegetable")]),
            recipe(2, 1, vec![(10, "protein")]),
        ];
        let ranked = rank_recipes(
            &ids(&[10]),
            &HashSet::new(),
            candidates,
            SuggestionMode::Strict,
        );

        // Recipe 1 misses ingredient 11; recipe 2 is fully covered
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, 2);
        assert_eq!(ranked[0].missing_count, 0);
    }

    #[test]
    fn test_worked_scoring_example() {
        // 3 non-staple ingredients, pantry covers carb + vegetable,
        // missing protein (weight 100), author not favorited:
        // score = 2*20 - 100 + 0 = -60
        let candidates = vec![recipe(
            1,
            1,
            vec![(10, "carb"), (11, "vegetable"), (12, "protein")],
        )];
        let pantry = ids(&[10, 11]);

        let ranked = rank_recipes(
            &pantry,
            &HashSet::new(),
            vec![recipe(1, 1, vec![(10, "carb"), (11, "vegetable"), (12, "protein")])],
            SuggestionMode::Strict,
        );
        // missing_count = 1, excluded in strict mode
        assert!(ranked.is_empty());

        // Excluded in loose mode too: score is negative
        let ranked = rank_recipes(&pantry, &HashSet::new(), candidates, SuggestionMode::Loose);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_loose_mode_missing_limit() {
        // Three missing non-staple ingredients is past the loose limit
        // even if the score were acceptable
        let candidates = vec![recipe(
            1,
            1,
            vec![
                (10, "spice"),
                (11, "spice"),
                (12, "spice"),
                (13, "vegetable"),
                (14, "vegetable"),
                (15, "vegetable"),
                (16, "vegetable"),
            ],
        )];
        // 4 matches * 20 = 80, 3 missing spices cost 30 -> score 50, but
        // missing_count = 3 > 2
        let ranked = rank_recipes(
            &ids(&[13, 14, 15, 16]),
            &HashSet::new(),
            candidates,
            SuggestionMode::Loose,
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_loose_mode_keeps_nonnegative_scores() {
        // 2 matches * 20 = 40, missing spice costs 10 -> score 30
        let candidates = vec![recipe(
            1,
            1,
            vec![(10, "carb"), (11, "vegetable"), (12, "spice")],
        )];
        let ranked = rank_recipes(
            &ids(&[10, 11]),
            &HashSet::new(),
            candidates,
            SuggestionMode::Loose,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 30);
        assert_eq!(ranked[0].match_count, 2);
        assert_eq!(ranked[0].missing_count, 1);
    }

    #[test]
    fn test_staples_never_enter_scoring() {
        // The staple is neither matched nor missing
        let candidates = vec![recipe(1, 1, vec![(10, "vegetable"), (99, "staple")])];
        let ranked = rank_recipes(
            &ids(&[10]),
            &HashSet::new(),
            candidates,
            SuggestionMode::Strict,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].match_count, 1);
        assert_eq!(ranked[0].missing_count, 0);
        assert_eq!(ranked[0].score, 20);
    }

    #[test]
    fn test_recipe_with_only_staples_passes_strict() {
        // Boundary case: zero non-staple ingredients is a trivial strict
        // pass with score 0
        let candidates = vec![recipe(1, 1, vec![(99, "staple")])];
        let ranked = rank_recipes(
            &ids(&[55]),
            &HashSet::new(),
            candidates,
            SuggestionMode::Strict,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].match_count, 0);
        assert_eq!(ranked[0].missing_count, 0);
        assert_eq!(ranked[0].score, 0);
    }

    #[test]
    fn test_author_bonus_applies_to_favorited_authors() {
        let candidates = vec![
            recipe(1, 7, vec![(10, "vegetable")]),
            recipe(2, 8, vec![(10, "vegetable")]),
        ];
        let ranked = rank_recipes(
            &ids(&[10]),
            &ids(&[7]),
            candidates,
            SuggestionMode::Strict,
        );
        assert_eq!(ranked.len(), 2);
        // Favorited author ranks first despite identical coverage
        assert_eq!(ranked[0].id, 1);
        assert_eq!(ranked[0].score, 70);
        assert_eq!(ranked[1].score, 20);
    }

    #[test]
    fn test_ties_break_by_recipe_id() {
        let candidates = vec![
            recipe(5, 1, vec![(10, "vegetable")]),
            recipe(3, 1, vec![(10, "vegetable")]),
            recipe(4, 1, vec![(10, "vegetable")]),
        ];
        let ranked = rank_recipes(
            &ids(&[10]),
            &HashSet::new(),
            candidates,
            SuggestionMode::Strict,
        );
        let order: Vec<i64> = ranked.iter().map(|r| r.id).collect();
        assert_eq!(order, vec![3, 4, 5]);
    }

    #[test]
    fn test_unknown_category_uses_default_weight() {
        // 0 matches, 1 missing with unrecognized category -> penalty 25,
        // within the loose missing limit but negative score
        let candidates = vec![recipe(1, 1, vec![(10, "exotic"), (11, "vegetable")])];
        let ranked = rank_recipes(
            &ids(&[11]),
            &HashSet::new(),
            candidates,
            SuggestionMode::Loose,
        );
        // 1 match * 20 - 25 = -5 -> excluded
        assert!(ranked.is_empty());
    }
}
