//! Database enumeration types for type-safe queries.
//!
//! Each enumeration mirrors a PostgreSQL ENUM type declared in the schema.

mod inventory_status;
mod user_role;

pub use inventory_status::InventoryStatus;
pub use user_role::UserRole;
