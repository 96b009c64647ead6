//! User model for PostgreSQL database operations.
//!
//! The stored row carries the password hash only; plaintext credentials
//! never reach this crate.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::users;
use crate::types::UserRole;

/// Registered user.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier.
    pub id: i32,
    /// Login email address, unique among all users.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Full name (6-15 characters).
    pub full_name: String,
    /// Age in years, at least 17.
    pub age: i32,
    /// Free-form occupation.
    pub occupation: String,
    /// Access role.
    pub role: UserRole,
    /// Timestamp when the user registered.
    pub created_at: Timestamp,
    /// Timestamp when the user was last updated.
    pub updated_at: Timestamp,
    /// Timestamp when the user was soft-deleted.
    pub deleted_at: Option<Timestamp>,
}

/// Data for registering a new user.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub age: i32,
    pub occupation: String,
    pub role: UserRole,
}

impl User {
    /// Returns whether the user has been soft-deleted.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
