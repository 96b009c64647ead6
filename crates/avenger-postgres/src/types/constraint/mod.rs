//! Database constraint violations organized by table.
//!
//! Constraint names are declared in the embedded migrations and parsed back
//! here, so storage errors can be classified without string matching in the
//! layers above.

mod inventories;
mod recipes;
mod users;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::inventories::InventoryConstraints;
pub use self::recipes::RecipeConstraints;
pub use self::users::UserConstraints;

/// Unified constraint violation enum that can represent any database constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    Inventory(InventoryConstraints),
    User(UserConstraints),
    Recipe(RecipeConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` if the constraint name is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use avenger_postgres::types::ConstraintViolation;
    ///
    /// let violation = ConstraintViolation::new("inventories_code_unique");
    /// assert!(violation.is_some());
    ///
    /// let unknown = ConstraintViolation::new("unknown_constraint");
    /// assert!(unknown.is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        let prefix = constraint.split('_').next()?;

        match prefix {
            "inventories" => InventoryConstraints::new(constraint).map(Self::Inventory),
            "users" => UserConstraints::new(constraint).map(Self::User),
            "recipes" => RecipeConstraints::new(constraint).map(Self::Recipe),
            _ => None,
        }
    }

    /// Returns the table name associated with this constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::Inventory(_) => "inventories",
            ConstraintViolation::User(_) => "users",
            ConstraintViolation::Recipe(_) => "recipes",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::Inventory(c) => c.categorize(),
            ConstraintViolation::User(c) => c.categorize(),
            ConstraintViolation::Recipe(c) => c.categorize(),
        }
    }

    /// Returns whether this violation comes from a uniqueness constraint.
    #[inline]
    pub fn is_uniqueness(&self) -> bool {
        self.constraint_category() == ConstraintCategory::Uniqueness
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::Inventory(c) => write!(f, "{}", c),
            ConstraintViolation::User(c) => write!(f, "{}", c),
            ConstraintViolation::Recipe(c) => write!(f, "{}", c),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ConstraintViolation::new(&value).ok_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_constraints() {
        assert_eq!(
            ConstraintViolation::new("inventories_code_unique"),
            Some(ConstraintViolation::Inventory(
                InventoryConstraints::CodeUnique
            ))
        );
        assert_eq!(
            ConstraintViolation::new("users_email_unique"),
            Some(ConstraintViolation::User(UserConstraints::EmailUnique))
        );
        assert_eq!(
            ConstraintViolation::new("recipes_rating_range"),
            Some(ConstraintViolation::Recipe(RecipeConstraints::RatingRange))
        );
    }

    #[test]
    fn rejects_unknown_constraints() {
        assert_eq!(ConstraintViolation::new("inventories_unknown"), None);
        assert_eq!(ConstraintViolation::new("accounts_email_unique"), None);
        assert_eq!(ConstraintViolation::new(""), None);
    }

    #[test]
    fn categorizes_constraints() {
        let code = ConstraintViolation::Inventory(InventoryConstraints::CodeUnique);
        assert!(code.is_uniqueness());
        assert_eq!(code.table_name(), "inventories");

        let rating = ConstraintViolation::Recipe(RecipeConstraints::RatingRange);
        assert_eq!(rating.constraint_category(), ConstraintCategory::Validation);
    }

    #[test]
    fn display_matches_constraint_name() {
        let email = ConstraintViolation::User(UserConstraints::EmailUnique);
        assert_eq!(email.to_string(), "users_email_unique");
    }
}
