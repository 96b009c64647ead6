//! Recipe business rules.

use std::sync::Arc;

use avenger_postgres::model::{NewRecipe, Recipe};
use serde::Deserialize;

use super::store::RecipeStore;
use super::{Error, Result, storage_error};
use crate::validation::{Constraint, FieldValue, Rule, Validate};

/// Incoming recipe fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipePayload {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Minutes.
    pub cook_time: Option<i32>,
    pub rating: Option<f64>,
}

impl Validate for RecipePayload {
    const RULES: &'static [Rule] = &[
        Rule::new("name", Constraint::Required),
        Rule::new("name", Constraint::MinLength(3)),
        Rule::new("name", Constraint::MaxLength(100)),
        Rule::new("description", Constraint::Required),
        Rule::new("description", Constraint::MinLength(10)),
        Rule::new("description", Constraint::MaxLength(1000)),
        Rule::new("cook_time", Constraint::Required),
        Rule::new("cook_time", Constraint::Gt(0.0)),
        Rule::new("rating", Constraint::Required),
        Rule::new("rating", Constraint::Gte(0.0)),
        Rule::new("rating", Constraint::Lte(5.0)),
    ];

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => self.name.as_deref().into(),
            "description" => self.description.as_deref().into(),
            "cook_time" => self.cook_time.into(),
            "rating" => self.rating.into(),
            _ => FieldValue::Missing,
        }
    }
}

impl RecipePayload {
    /// Validates the payload and normalizes it into an insertable row.
    pub fn into_new_recipe(self) -> Result<NewRecipe> {
        self.validate().map_err(Error::validation)?;

        Ok(NewRecipe {
            name: self.name.unwrap_or_default().trim().to_owned(),
            description: self.description.unwrap_or_default().trim().to_owned(),
            cook_time: self.cook_time.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
        })
    }
}

/// Recipe operations on top of a [`RecipeStore`].
#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
}

impl RecipeService {
    /// Creates a new service over `store`.
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    /// Lists recipes that have not been deleted.
    pub async fn list(&self) -> Result<Vec<Recipe>> {
        self.store
            .list_recipes()
            .await
            .map_err(storage_error("Failed to retrieve recipes"))
    }

    /// Validates and stores a new recipe.
    pub async fn create(&self, payload: RecipePayload) -> Result<Recipe> {
        let new_recipe = payload.into_new_recipe()?;

        self.store
            .create_recipe(new_recipe)
            .await
            .map_err(storage_error("Failed to create recipe"))
    }

    /// Soft-deletes the recipe with `id`.
    pub async fn delete(&self, id: i32) -> Result<Recipe> {
        self.store
            .delete_recipe(id)
            .await
            .map_err(storage_error("Failed to delete recipe"))?
            .ok_or_else(|| Error::not_found("Recipe not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::service::store::memory::MemoryRecipeStore;

    fn payload() -> RecipePayload {
        RecipePayload {
            name: Some(" Tomato soup ".into()),
            description: Some("Simmer tomatoes with garlic and basil.".into()),
            cook_time: Some(30),
            rating: Some(4.5),
        }
    }

    #[test]
    fn bounds_are_checked() {
        let invalid = RecipePayload {
            cook_time: Some(0),
            rating: Some(5.5),
            description: Some("short".into()),
            ..payload()
        };

        let error = invalid.into_new_recipe().unwrap_err();
        let errors = error.errors().unwrap();
        assert_eq!(
            errors.message("cook_time"),
            Some("cook_time must be greater than 0")
        );
        assert_eq!(
            errors.message("rating"),
            Some("rating must be less than or equal to 5")
        );
        assert_eq!(
            errors.message("description"),
            Some("description must be at least 10 characters")
        );
        assert!(errors.message("name").is_none());
    }

    #[tokio::test]
    async fn create_list_delete() -> anyhow::Result<()> {
        let service = RecipeService::new(Arc::new(MemoryRecipeStore::new()));
        let recipe = service.create(payload()).await?;
        assert_eq!(recipe.name, "Tomato soup");
        assert_eq!(service.list().await?.len(), 1);

        service.delete(recipe.id).await?;
        assert!(service.list().await?.is_empty());

        let error = service.delete(recipe.id).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), "Recipe not found");
        Ok(())
    }
}
