//! [`PgClient`] as the production store.

use async_trait::async_trait;
use avenger_postgres::PgClient;
use avenger_postgres::model::{
    Inventory, NewInventory, NewRecipe, NewUser, Recipe, UpdateInventory, User,
};
use avenger_postgres::query::{InventoryRepository, RecipeRepository, UserRepository};

use super::{InventoryStore, RecipeStore, StoreResult, UserStore};

#[async_trait]
impl InventoryStore for PgClient {
    async fn list_inventories(&self) -> StoreResult<Vec<Inventory>> {
        let mut conn = self.get_connection().await?;
        Ok(conn.list_inventories().await?)
    }

    async fn find_inventory(&self, id: i32) -> StoreResult<Option<Inventory>> {
        let mut conn = self.get_connection().await?;
        Ok(conn.find_inventory_by_id(id).await?)
    }

    async fn create_inventory(&self, new_inventory: NewInventory) -> StoreResult<Inventory> {
        let mut conn = self.get_connection().await?;
        Ok(conn.create_inventory(new_inventory).await?)
    }

    async fn update_inventory(
        &self,
        id: i32,
        changes: UpdateInventory,
    ) -> StoreResult<Option<Inventory>> {
        let mut conn = self.get_connection().await?;
        Ok(conn.update_inventory(id, changes).await?)
    }

    async fn delete_inventory(&self, id: i32) -> StoreResult<Option<Inventory>> {
        let mut conn = self.get_connection().await?;
        Ok(conn.delete_inventory(id).await?)
    }
}

#[async_trait]
impl UserStore for PgClient {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut conn = self.get_connection().await?;
        Ok(conn.create_user(new_user).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let mut conn = self.get_connection().await?;
        Ok(conn.find_user_by_email(email).await?)
    }
}

#[async_trait]
impl RecipeStore for PgClient {
    async fn list_recipes(&self) -> StoreResult<Vec<Recipe>> {
        let mut conn = self.get_connection().await?;
        Ok(conn.list_recipes().await?)
    }

    async fn create_recipe(&self, new_recipe: NewRecipe) -> StoreResult<Recipe> {
        let mut conn = self.get_connection().await?;
        Ok(conn.create_recipe(new_recipe).await?)
    }

    async fn delete_recipe(&self, id: i32) -> StoreResult<Option<Recipe>> {
        let mut conn = self.get_connection().await?;
        Ok(conn.delete_recipe(id).await?)
    }
}
