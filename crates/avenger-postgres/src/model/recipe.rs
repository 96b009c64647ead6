//! Recipe model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::recipes;

/// Recipe stored in the system.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    /// Unique recipe identifier.
    pub id: i32,
    /// Display name (3-100 characters).
    pub name: String,
    /// Description (10-1000 characters).
    pub description: String,
    /// Cooking time in minutes, strictly positive.
    pub cook_time: i32,
    /// Rating between 0 and 5 inclusive.
    pub rating: f64,
    /// Timestamp when the recipe was created.
    pub created_at: Timestamp,
    /// Timestamp when the recipe was last updated.
    pub updated_at: Timestamp,
    /// Timestamp when the recipe was soft-deleted.
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new recipe.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRecipe {
    pub name: String,
    pub description: String,
    pub cook_time: i32,
    pub rating: f64,
}

impl Recipe {
    /// Returns whether the recipe has been soft-deleted.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
