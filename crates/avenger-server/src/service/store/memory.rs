//! In-process stores backed by vectors.
//!
//! They enforce the same unique keys as the database schema (inventory code,
//! user email) and the same soft-delete visibility rules as [`PgClient`]. The
//! handler and service tests run against them.
//!
//! [`PgClient`]: avenger_postgres::PgClient

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use avenger_postgres::model::{
    Inventory, NewInventory, NewRecipe, NewUser, Recipe, UpdateInventory, User,
};
use avenger_postgres::types::{
    ConstraintViolation, InventoryConstraints, UserConstraints,
};
use jiff_diesel::Timestamp;
use tokio::sync::RwLock;

use super::{InventoryStore, RecipeStore, StoreError, StoreResult, UserStore};

fn now() -> Timestamp {
    jiff::Timestamp::now().into()
}

/// Row storage with a monotonically increasing id sequence.
#[derive(Debug)]
struct Table<T> {
    rows: RwLock<Vec<T>>,
    next_id: AtomicUsize,
    operations: AtomicUsize,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            operations: AtomicUsize::new(0),
        }
    }
}

impl<T> Table<T> {
    fn touch(&self) {
        self.operations.fetch_add(1, Ordering::Relaxed);
    }

    fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::Relaxed) as i32
    }

    fn operations(&self) -> usize {
        self.operations.load(Ordering::Relaxed)
    }
}

/// In-memory [`InventoryStore`].
#[derive(Debug, Default)]
pub struct MemoryInventoryStore {
    table: Table<Inventory>,
}

impl MemoryInventoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations served so far.
    pub fn operations(&self) -> usize {
        self.table.operations()
    }
}

fn code_conflict() -> StoreError {
    StoreError::Conflict(ConstraintViolation::Inventory(
        InventoryConstraints::CodeUnique,
    ))
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn list_inventories(&self) -> StoreResult<Vec<Inventory>> {
        self.table.touch();
        Ok(self.table.rows.read().await.clone())
    }

    async fn find_inventory(&self, id: i32) -> StoreResult<Option<Inventory>> {
        self.table.touch();
        let rows = self.table.rows.read().await;
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn create_inventory(&self, new_inventory: NewInventory) -> StoreResult<Inventory> {
        self.table.touch();
        let mut rows = self.table.rows.write().await;
        if rows.iter().any(|row| row.code == new_inventory.code) {
            return Err(code_conflict());
        }

        let inventory = Inventory {
            id: self.table.next_id(),
            name: new_inventory.name,
            code: new_inventory.code,
            stock: new_inventory.stock,
            description: new_inventory.description,
            status: new_inventory.status,
            created_at: now(),
            updated_at: now(),
        };

        rows.push(inventory.clone());
        Ok(inventory)
    }

    async fn update_inventory(
        &self,
        id: i32,
        changes: UpdateInventory,
    ) -> StoreResult<Option<Inventory>> {
        self.table.touch();
        let mut rows = self.table.rows.write().await;
        let Some(index) = rows.iter().position(|row| row.id == id) else {
            return Ok(None);
        };

        if rows
            .iter()
            .any(|row| row.id != id && row.code == changes.code)
        {
            return Err(code_conflict());
        }

        let row = &mut rows[index];
        row.name = changes.name;
        row.code = changes.code;
        row.stock = changes.stock;
        row.description = changes.description;
        row.status = changes.status;
        row.updated_at = now();

        Ok(Some(row.clone()))
    }

    async fn delete_inventory(&self, id: i32) -> StoreResult<Option<Inventory>> {
        self.table.touch();
        let mut rows = self.table.rows.write().await;
        let position = rows.iter().position(|row| row.id == id);
        Ok(position.map(|index| rows.remove(index)))
    }
}

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    table: Table<User>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations served so far.
    pub fn operations(&self) -> usize {
        self.table.operations()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        self.table.touch();
        let mut rows = self.table.rows.write().await;
        if rows.iter().any(|row| row.email == new_user.email) {
            return Err(StoreError::Conflict(ConstraintViolation::User(
                UserConstraints::EmailUnique,
            )));
        }

        let user = User {
            id: self.table.next_id(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            full_name: new_user.full_name,
            age: new_user.age,
            occupation: new_user.occupation,
            role: new_user.role,
            created_at: now(),
            updated_at: now(),
            deleted_at: None,
        };

        rows.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.table.touch();
        let rows = self.table.rows.read().await;
        Ok(rows
            .iter()
            .find(|row| row.email == email && !row.is_deleted())
            .cloned())
    }
}

/// In-memory [`RecipeStore`].
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    table: Table<Recipe>,
}

impl MemoryRecipeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations served so far.
    pub fn operations(&self) -> usize {
        self.table.operations()
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn list_recipes(&self) -> StoreResult<Vec<Recipe>> {
        self.table.touch();
        let rows = self.table.rows.read().await;
        Ok(rows.iter().filter(|row| !row.is_deleted()).cloned().collect())
    }

    async fn create_recipe(&self, new_recipe: NewRecipe) -> StoreResult<Recipe> {
        self.table.touch();
        let recipe = Recipe {
            id: self.table.next_id(),
            name: new_recipe.name,
            description: new_recipe.description,
            cook_time: new_recipe.cook_time,
            rating: new_recipe.rating,
            created_at: now(),
            updated_at: now(),
            deleted_at: None,
        };

        self.table.rows.write().await.push(recipe.clone());
        Ok(recipe)
    }

    async fn delete_recipe(&self, id: i32) -> StoreResult<Option<Recipe>> {
        self.table.touch();
        let mut rows = self.table.rows.write().await;
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.id == id && !row.is_deleted())
        else {
            return Ok(None);
        };

        row.deleted_at = Some(now());
        row.updated_at = now();
        Ok(Some(row.clone()))
    }
}

#[cfg(test)]
mod tests {
    use avenger_postgres::types::{InventoryStatus, UserRole};

    use super::*;

    fn new_inventory(code: &str) -> NewInventory {
        NewInventory {
            name: "Laptop".into(),
            code: code.into(),
            stock: 1,
            description: String::new(),
            status: InventoryStatus::Active,
        }
    }

    #[tokio::test]
    async fn inventory_code_is_unique() -> anyhow::Result<()> {
        let store = MemoryInventoryStore::new();
        let first = store.create_inventory(new_inventory("LAP-1")).await?;
        assert_eq!(first.id, 1);

        let duplicate = store.create_inventory(new_inventory("LAP-1")).await;
        assert!(matches!(duplicate, Err(StoreError::Conflict(_))));

        let second = store.create_inventory(new_inventory("LAP-2")).await?;
        let clash = store
            .update_inventory(second.id, new_inventory("LAP-1").into())
            .await;
        assert!(matches!(clash, Err(StoreError::Conflict(_))));

        Ok(())
    }

    #[tokio::test]
    async fn missing_inventory_yields_none() -> anyhow::Result<()> {
        let store = MemoryInventoryStore::new();
        assert!(store.find_inventory(9).await?.is_none());
        assert!(store.update_inventory(9, new_inventory("X").into()).await?.is_none());
        assert!(store.delete_inventory(9).await?.is_none());
        assert_eq!(store.operations(), 3);

        store.create_inventory(new_inventory("TAKEN")).await?;
        let missing = store.update_inventory(9, new_inventory("TAKEN").into()).await?;
        assert!(missing.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn user_email_is_unique() -> anyhow::Result<()> {
        let store = MemoryUserStore::new();
        let new_user = NewUser {
            email: "ana@example.com".into(),
            password_hash: "hash".into(),
            full_name: "Ana Lovelace".into(),
            age: 30,
            occupation: "Engineer".into(),
            role: UserRole::Admin,
        };

        store.create_user(new_user.clone()).await?;
        assert!(matches!(
            store.create_user(new_user).await,
            Err(StoreError::Conflict(ConstraintViolation::User(_)))
        ));
        assert!(store.find_user_by_email("ana@example.com").await?.is_some());
        assert!(store.find_user_by_email("bob@example.com").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn recipes_are_soft_deleted() -> anyhow::Result<()> {
        let store = MemoryRecipeStore::new();
        let recipe = store
            .create_recipe(NewRecipe {
                name: "Soup".into(),
                description: "A warm tomato soup".into(),
                cook_time: 30,
                rating: 4.5,
            })
            .await?;

        let deleted = store.delete_recipe(recipe.id).await?;
        assert!(deleted.is_some_and(|r| r.is_deleted()));
        assert!(store.list_recipes().await?.is_empty());
        assert!(store.delete_recipe(recipe.id).await?.is_none());

        Ok(())
    }
}
