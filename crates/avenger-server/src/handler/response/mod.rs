//! Response types for HTTP handlers.

mod envelope;
mod error_response;
mod inventories;
mod recipes;
mod users;

pub use envelope::Envelope;
pub use error_response::ErrorResponse;
pub use inventories::{Inventories, Inventory, Identifier};
pub use recipes::{Recipe, Recipes};
pub use users::{Login, User, UserSummary};
