//! Database models for all entities in the system.
//!
//! This module contains Diesel model definitions for all database tables,
//! including structs for querying, inserting, and updating records.

mod inventory;
mod recipe;
mod user;

pub use inventory::{Inventory, NewInventory, UpdateInventory};
pub use recipe::{NewRecipe, Recipe};
pub use user::{NewUser, User};
