//! Recipes table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Recipes table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum RecipeConstraints {
    #[strum(serialize = "recipes_pkey")]
    PrimaryKey,

    #[strum(serialize = "recipes_cook_time_positive")]
    CookTimePositive,
    #[strum(serialize = "recipes_rating_range")]
    RatingRange,
}

impl RecipeConstraints {
    /// Creates a new [`RecipeConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            RecipeConstraints::CookTimePositive | RecipeConstraints::RatingRange => {
                ConstraintCategory::Validation
            }
            RecipeConstraints::PrimaryKey => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<RecipeConstraints> for String {
    #[inline]
    fn from(val: RecipeConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for RecipeConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
