//! User role enumeration for access control.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Defines the role of a registered user.
///
/// This enumeration corresponds to the `USER_ROLE` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::UserRole"]
pub enum UserRole {
    /// Regular administrator, may manage recipes.
    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    #[strum(serialize = "admin")]
    #[default]
    Admin,

    /// Super administrator, may additionally delete recipes.
    #[db_rename = "superadmin"]
    #[serde(rename = "superadmin")]
    #[strum(serialize = "superadmin")]
    Superadmin,
}

impl UserRole {
    /// Wire names of every role, in declaration order.
    pub const NAMES: &'static [&'static str] = &["admin", "superadmin"];

    /// Returns the wire representation of the role.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Superadmin => "superadmin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("admin".parse::<UserRole>().ok(), Some(UserRole::Admin));
        assert_eq!(
            "superadmin".parse::<UserRole>().ok(),
            Some(UserRole::Superadmin)
        );
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn defaults_to_admin() {
        assert_eq!(UserRole::default(), UserRole::Admin);
        assert_eq!(UserRole::default().to_string(), "admin");
    }
}
