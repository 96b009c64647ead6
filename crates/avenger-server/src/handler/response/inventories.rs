use avenger_postgres::model;
use avenger_postgres::types::InventoryStatus;
use serde::{Deserialize, Serialize};

/// Inventory item as returned to clients.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub stock: i32,
    pub description: String,
    pub status: InventoryStatus,
}

impl From<model::Inventory> for Inventory {
    fn from(inventory: model::Inventory) -> Self {
        Self {
            id: inventory.id,
            name: inventory.name,
            code: inventory.code,
            stock: inventory.stock,
            description: inventory.description,
            status: inventory.status,
        }
    }
}

/// List of inventory items.
pub type Inventories = Vec<Inventory>;

/// Identifier of a created, updated or deleted resource.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub id: i32,
}

impl Identifier {
    #[inline]
    pub fn new(id: i32) -> Self {
        Self { id }
    }
}
