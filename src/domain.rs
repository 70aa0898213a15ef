//! Domain value types shared across services and routes
//!
//! Status, difficulty and category values are stored as snake_case TEXT in
//! the database; `strum` handles the string round-trip and `serde` the JSON
//! one.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};

#[derive(
    EnumString, Display, AsRefStr, Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecipeStatus {
    #[default]
    Private,
    PendingApproval,
    Public,
    Rejected,
}

#[derive(
    EnumString, Display, AsRefStr, Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(
    EnumString, Display, AsRefStr, Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IngredientStatus {
    #[default]
    PendingApproval,
    Approved,
    Rejected,
}

#[derive(
    EnumString, Display, AsRefStr, Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    Protein,
    Carb,
    Vegetable,
    Spice,
    Staple,
    #[default]
    Other,
}

/// Penalty weight applied when a recipe ingredient of an unrecognized
/// category is missing from the pantry.
pub const DEFAULT_MISSING_WEIGHT: i64 = 25;

impl IngredientCategory {
    /// Penalty weight applied when an ingredient of this category is
    /// missing from the pantry. Staples never reach scoring.
    pub fn missing_weight(self) -> i64 {
        match self {
            IngredientCategory::Protein => 100,
            IngredientCategory::Carb => 80,
            IngredientCategory::Vegetable => 50,
            IngredientCategory::Spice => 10,
            IngredientCategory::Staple | IngredientCategory::Other => DEFAULT_MISSING_WEIGHT,
        }
    }

    pub fn is_staple(self) -> bool {
        self == IngredientCategory::Staple
    }
}

/// Weight for a raw category string as stored in the database
///
/// Unrecognized values fall back to the default weight rather than failing
/// the whole suggestion query.
pub fn category_missing_weight(raw: &str) -> i64 {
    IngredientCategory::from_str(raw)
        .map(IngredientCategory::missing_weight)
        .unwrap_or(DEFAULT_MISSING_WEIGHT)
}

/// Whether a raw category string names the staple category
pub fn category_is_staple(raw: &str) -> bool {
    IngredientCategory::from_str(raw)
        .map(IngredientCategory::is_staple)
        .unwrap_or(false)
}
