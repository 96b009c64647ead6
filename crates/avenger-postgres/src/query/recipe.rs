//! Recipe repository with soft deletion.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;

use crate::model::{NewRecipe, Recipe};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for recipe database operations.
pub trait RecipeRepository {
    /// Lists every recipe that has not been soft-deleted, ordered by identifier.
    fn list_recipes(&mut self) -> impl Future<Output = PgResult<Vec<Recipe>>> + Send;

    /// Inserts a new recipe.
    fn create_recipe(
        &mut self,
        new_recipe: NewRecipe,
    ) -> impl Future<Output = PgResult<Recipe>> + Send;

    /// Soft deletes a recipe by setting the deletion timestamp.
    ///
    /// Returns `None` if the recipe does not exist or was already deleted.
    fn delete_recipe(
        &mut self,
        recipe_id: i32,
    ) -> impl Future<Output = PgResult<Option<Recipe>>> + Send;
}

impl RecipeRepository for PgConnection {
    async fn list_recipes(&mut self) -> PgResult<Vec<Recipe>> {
        use schema::recipes::{self, dsl};

        recipes::table
            .filter(dsl::deleted_at.is_null())
            .order(dsl::id.asc())
            .select(Recipe::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn create_recipe(&mut self, new_recipe: NewRecipe) -> PgResult<Recipe> {
        use schema::recipes;

        diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(Recipe::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_recipe(&mut self, recipe_id: i32) -> PgResult<Option<Recipe>> {
        use schema::recipes::{self, dsl};

        let now = Timestamp::now();

        diesel::update(
            recipes::table
                .filter(dsl::id.eq(recipe_id))
                .filter(dsl::deleted_at.is_null()),
        )
        .set((
            dsl::deleted_at.eq(Some(jiff_diesel::Timestamp::from(now))),
            dsl::updated_at.eq(jiff_diesel::Timestamp::from(now)),
        ))
        .returning(Recipe::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }
}
