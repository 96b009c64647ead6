//! Contains constraints, enumerations and other custom types.

mod constraint;
mod enums;

pub use constraint::{
    ConstraintCategory, ConstraintViolation, InventoryConstraints, RecipeConstraints,
    UserConstraints,
};
pub use enums::{InventoryStatus, UserRole};
