//! Inventory repository for managing inventory items.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;

use crate::model::{Inventory, NewInventory, UpdateInventory};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for inventory database operations.
pub trait InventoryRepository {
    /// Lists every inventory item ordered by identifier.
    fn list_inventories(&mut self) -> impl Future<Output = PgResult<Vec<Inventory>>> + Send;

    /// Finds an inventory item by its identifier.
    fn find_inventory_by_id(
        &mut self,
        inventory_id: i32,
    ) -> impl Future<Output = PgResult<Option<Inventory>>> + Send;

    /// Inserts a new inventory item.
    ///
    /// Fails with a constraint violation when the code is already taken.
    fn create_inventory(
        &mut self,
        new_inventory: NewInventory,
    ) -> impl Future<Output = PgResult<Inventory>> + Send;

    /// Replaces every mutable column of an inventory item.
    ///
    /// Returns `None` if the item does not exist.
    fn update_inventory(
        &mut self,
        inventory_id: i32,
        changes: UpdateInventory,
    ) -> impl Future<Output = PgResult<Option<Inventory>>> + Send;

    /// Permanently deletes an inventory item.
    ///
    /// Returns `None` if the item does not exist.
    fn delete_inventory(
        &mut self,
        inventory_id: i32,
    ) -> impl Future<Output = PgResult<Option<Inventory>>> + Send;
}

impl InventoryRepository for PgConnection {
    async fn list_inventories(&mut self) -> PgResult<Vec<Inventory>> {
        use schema::inventories::{self, dsl};

        inventories::table
            .order(dsl::id.asc())
            .select(Inventory::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_inventory_by_id(&mut self, inventory_id: i32) -> PgResult<Option<Inventory>> {
        use schema::inventories::{self, dsl};

        inventories::table
            .filter(dsl::id.eq(inventory_id))
            .select(Inventory::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn create_inventory(&mut self, new_inventory: NewInventory) -> PgResult<Inventory> {
        use schema::inventories;

        diesel::insert_into(inventories::table)
            .values(&new_inventory)
            .returning(Inventory::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_inventory(
        &mut self,
        inventory_id: i32,
        changes: UpdateInventory,
    ) -> PgResult<Option<Inventory>> {
        use schema::inventories::{self, dsl};

        let updated_at = jiff_diesel::Timestamp::from(Timestamp::now());

        diesel::update(inventories::table.filter(dsl::id.eq(inventory_id)))
            .set((&changes, dsl::updated_at.eq(updated_at)))
            .returning(Inventory::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn delete_inventory(&mut self, inventory_id: i32) -> PgResult<Option<Inventory>> {
        use schema::inventories::{self, dsl};

        diesel::delete(inventories::table.filter(dsl::id.eq(inventory_id)))
            .returning(Inventory::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }
}
