//! Database query repositories for all entities in the system.
//!
//! Each repository is a trait implemented for [`PgConnection`], so callers
//! acquire a pooled connection and invoke the operations directly on it.
//!
//! [`PgConnection`]: crate::PgConnection

mod inventory;
mod recipe;
mod user;

pub use inventory::InventoryRepository;
pub use recipe::RecipeRepository;
pub use user::UserRepository;
