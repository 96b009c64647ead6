//! Inventory status enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Operational status of an inventory item.
///
/// This enumeration corresponds to the `INVENTORY_STATUS` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::InventoryStatus"]
pub enum InventoryStatus {
    #[db_rename = "active"]
    #[serde(rename = "active")]
    #[strum(serialize = "active")]
    #[default]
    Active,

    #[db_rename = "broken"]
    #[serde(rename = "broken")]
    #[strum(serialize = "broken")]
    Broken,
}

impl InventoryStatus {
    /// Wire names of every status, in declaration order.
    pub const NAMES: &'static [&'static str] = &["active", "broken"];
}
