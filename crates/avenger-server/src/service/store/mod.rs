//! Storage capabilities consumed by the resource services.
//!
//! Each trait is object-safe so services hold an `Arc<dyn _Store>`. The
//! production implementation is [`PgClient`]; [`memory`] provides in-process
//! stores with the same uniqueness and soft-delete behavior.
//!
//! [`PgClient`]: avenger_postgres::PgClient

pub mod memory;
mod postgres;

use async_trait::async_trait;
use avenger_postgres::PgError;
use avenger_postgres::model::{
    Inventory, NewInventory, NewRecipe, NewUser, Recipe, UpdateInventory, User,
};
use avenger_postgres::types::ConstraintViolation;

/// Storage failure as seen by the resource services.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(ConstraintViolation),
    #[error(transparent)]
    Database(PgError),
}

impl StoreError {
    /// Returns the violated constraint of a conflict.
    pub fn conflict(&self) -> Option<ConstraintViolation> {
        match self {
            Self::Conflict(violation) => Some(*violation),
            Self::Database(_) => None,
        }
    }
}

impl From<PgError> for StoreError {
    fn from(error: PgError) -> Self {
        match error.constraint_violation() {
            Some(violation) if error.is_unique_violation() => Self::Conflict(violation),
            _ => Self::Database(error),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Inventory item persistence.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Lists all items ordered by id.
    async fn list_inventories(&self) -> StoreResult<Vec<Inventory>>;

    async fn find_inventory(&self, id: i32) -> StoreResult<Option<Inventory>>;

    async fn create_inventory(&self, new_inventory: NewInventory) -> StoreResult<Inventory>;

    /// Replaces the item; `None` if the id does not exist.
    async fn update_inventory(
        &self,
        id: i32,
        changes: UpdateInventory,
    ) -> StoreResult<Option<Inventory>>;

    /// Deletes the item; `None` if the id does not exist.
    async fn delete_inventory(&self, id: i32) -> StoreResult<Option<Inventory>>;
}

/// User persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;

    /// Finds a user that is not soft-deleted.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Recipe persistence.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Lists recipes that are not soft-deleted, ordered by id.
    async fn list_recipes(&self) -> StoreResult<Vec<Recipe>>;

    async fn create_recipe(&self, new_recipe: NewRecipe) -> StoreResult<Recipe>;

    /// Soft-deletes the recipe; `None` if it does not exist or is already deleted.
    async fn delete_recipe(&self, id: i32) -> StoreResult<Option<Recipe>>;
}

#[cfg(test)]
mod tests {
    use avenger_postgres::types::InventoryConstraints;

    use super::*;

    #[test]
    fn non_constraint_errors_stay_database_errors() {
        let error = StoreError::from(PgError::Closed);
        assert!(matches!(error, StoreError::Database(PgError::Closed)));
        assert!(error.conflict().is_none());
    }

    #[test]
    fn conflict_exposes_violation() {
        let violation = ConstraintViolation::Inventory(InventoryConstraints::CodeUnique);
        let error = StoreError::Conflict(violation);
        assert_eq!(error.conflict(), Some(violation));
    }
}
