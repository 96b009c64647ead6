use avenger_postgres::model;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Recipe as returned to clients.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Minutes.
    pub cook_time: i32,
    pub rating: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<model::Recipe> for Recipe {
    fn from(recipe: model::Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            description: recipe.description,
            cook_time: recipe.cook_time,
            rating: recipe.rating,
            created_at: recipe.created_at.into(),
            updated_at: recipe.updated_at.into(),
        }
    }
}

/// List of recipes.
pub type Recipes = Vec<Recipe>;
