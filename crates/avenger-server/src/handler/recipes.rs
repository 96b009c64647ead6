//! Recipe handlers; mutations are restricted to superadmins.

use avenger_postgres::types::UserRole;
use axum::Router;
use axum::extract::State;
use axum::routing::{delete, get, post};

use crate::extract::{Claims, Json, ResourceId};
use crate::handler::Result;
use crate::handler::response::{Envelope, Identifier, Recipe, Recipes};
use crate::middleware::RouterAuthExt;
use crate::service::{RecipePayload, RecipeService, ServiceState};
use crate::utility::tracing_targets::TRACING_TARGET_HANDLER;

/// Roles allowed to create and delete recipes.
const RECIPE_EDITORS: &[UserRole] = &[UserRole::Superadmin];

/// Lists every live recipe.
#[tracing::instrument(skip_all)]
async fn list_recipes(State(recipes): State<RecipeService>) -> Result<Envelope<Recipes>> {
    let items = recipes.list().await?;
    let items: Recipes = items.into_iter().map(Recipe::from).collect();
    Ok(Envelope::success(items))
}

/// Creates a recipe.
#[tracing::instrument(skip_all)]
async fn create_recipe(
    State(recipes): State<RecipeService>,
    Claims(claims): Claims,
    Json(payload): Json<RecipePayload>,
) -> Result<Envelope<Recipe>> {
    let recipe = recipes.create(payload).await?;

    tracing::info!(
        target: TRACING_TARGET_HANDLER,
        id = recipe.id,
        user_id = claims.user_id,
        "recipe created"
    );

    Ok(Envelope::created("Recipe created successfully", recipe.into()))
}

/// Soft-deletes a recipe.
#[tracing::instrument(skip_all, fields(id = id.get()))]
async fn delete_recipe(
    State(recipes): State<RecipeService>,
    Claims(claims): Claims,
    id: ResourceId,
) -> Result<Envelope<Identifier>> {
    let recipe = recipes.delete(id.get()).await?;

    tracing::info!(
        target: TRACING_TARGET_HANDLER,
        id = recipe.id,
        user_id = claims.user_id,
        "recipe deleted"
    );

    Ok(Envelope::new(
        "Recipe deleted successfully",
        Identifier::new(recipe.id),
    ))
}

/// Returns a [`Router`] with all related routes.
///
/// Listing is public; creation and deletion require a superadmin token.
pub fn routes(state: &ServiceState) -> Router<ServiceState> {
    let protected = Router::new()
        .route("/recipes", post(create_recipe))
        .route("/recipes/{id}", delete(delete_recipe))
        .with_required_roles(state.access_policy.clone(), RECIPE_EDITORS);

    Router::new()
        .route("/recipes", get(list_recipes))
        .merge(protected)
}
