//! User repository for registration and login lookups.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{NewUser, User};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user database operations.
pub trait UserRepository {
    /// Creates a new user.
    ///
    /// Fails with a constraint violation when the email is already registered.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by email address, excluding soft-deleted users.
    ///
    /// The comparison is exact; callers normalize the address beforehand.
    fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, new_user: NewUser) -> PgResult<User> {
        use schema::users;

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_user_by_email(&mut self, email: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::email.eq(email))
            .filter(dsl::deleted_at.is_null())
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }
}
