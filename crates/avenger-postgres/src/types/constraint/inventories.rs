//! Inventories table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Inventories table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum InventoryConstraints {
    // Inventory primary key constraint
    #[strum(serialize = "inventories_pkey")]
    PrimaryKey,

    // Inventory validation constraints
    #[strum(serialize = "inventories_stock_non_negative")]
    StockNonNegative,

    // Inventory unique constraints
    #[strum(serialize = "inventories_code_unique")]
    CodeUnique,
}

impl InventoryConstraints {
    /// Creates a new [`InventoryConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            InventoryConstraints::StockNonNegative => ConstraintCategory::Validation,
            InventoryConstraints::PrimaryKey | InventoryConstraints::CodeUnique => {
                ConstraintCategory::Uniqueness
            }
        }
    }
}

impl From<InventoryConstraints> for String {
    #[inline]
    fn from(val: InventoryConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for InventoryConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
