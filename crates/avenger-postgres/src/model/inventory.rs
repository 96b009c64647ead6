//! Inventory model for PostgreSQL database operations.
//!
//! ## Models
//!
//! - [`Inventory`] - Stored inventory item
//! - [`NewInventory`] - Data structure for creating a new inventory item
//! - [`UpdateInventory`] - Full replacement of an existing inventory item

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::inventories;
use crate::types::InventoryStatus;

/// Inventory item stored in the system.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = inventories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Inventory {
    /// Unique inventory identifier.
    pub id: i32,
    /// Display name (3-100 characters).
    pub name: String,
    /// Uppercased unique code (3-50 characters).
    pub code: String,
    /// Units in stock, never negative.
    pub stock: i32,
    /// Free-form description, empty when not provided.
    pub description: String,
    /// Operational status.
    pub status: InventoryStatus,
    /// Timestamp when the item was created.
    pub created_at: Timestamp,
    /// Timestamp when the item was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new inventory item.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = inventories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewInventory {
    pub name: String,
    pub code: String,
    pub stock: i32,
    pub description: String,
    pub status: InventoryStatus,
}

/// Data for replacing every mutable column of an inventory item.
#[derive(Debug, Default, Clone, AsChangeset)]
#[diesel(table_name = inventories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateInventory {
    pub name: String,
    pub code: String,
    pub stock: i32,
    pub description: String,
    pub status: InventoryStatus,
}

impl From<NewInventory> for UpdateInventory {
    fn from(value: NewInventory) -> Self {
        Self {
            name: value.name,
            code: value.code,
            stock: value.stock,
            description: value.description,
            status: value.status,
        }
    }
}
