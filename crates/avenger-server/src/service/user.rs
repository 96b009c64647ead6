//! Registration and login.

use std::sync::Arc;

use avenger_postgres::model::{NewUser, User};
use avenger_postgres::types::{ConstraintViolation, UserConstraints, UserRole};
use serde::Deserialize;

use super::store::UserStore;
use super::{Error, PasswordHasher, Result, TokenService, storage_error};
use crate::utility::tracing_targets::TRACING_TARGET_SERVICE;
use crate::validation::{Constraint, FieldValue, Rule, Validate, ValidationErrors};

/// Incoming registration fields.
#[derive(Clone, Default, Deserialize)]
pub struct RegisterPayload {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub occupation: Option<String>,
    /// Defaults to `admin` when absent.
    pub role: Option<String>,
}

impl std::fmt::Debug for RegisterPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterPayload")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("age", &self.age)
            .field("occupation", &self.occupation)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl Validate for RegisterPayload {
    const RULES: &'static [Rule] = &[
        Rule::new("email", Constraint::Required),
        Rule::new("email", Constraint::Email),
        Rule::new("password", Constraint::Required),
        Rule::new("password", Constraint::MinLength(8)),
        Rule::new("full_name", Constraint::Required),
        Rule::new("full_name", Constraint::MinLength(6)),
        Rule::new("full_name", Constraint::MaxLength(15)),
        Rule::new("age", Constraint::Required),
        Rule::new("age", Constraint::Gte(17.0)),
        Rule::new("occupation", Constraint::Required),
        Rule::new("role", Constraint::OneOf(UserRole::NAMES)),
    ];

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "email" => self.email.as_deref().into(),
            "password" => self.password.as_deref().into(),
            "full_name" => self.full_name.as_deref().into(),
            "age" => self.age.into(),
            "occupation" => self.occupation.as_deref().into(),
            "role" => self.role.as_deref().into(),
            _ => FieldValue::Missing,
        }
    }
}

/// Incoming login fields.
#[derive(Clone, Default, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginPayload")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    /// Signed session token.
    pub token: String,
    pub user: User,
}

/// User registration and credential checks on top of a [`UserStore`].
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl UserService {
    /// Creates a new service.
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Validates the payload, hashes the password and stores the user.
    pub async fn register(&self, payload: RegisterPayload) -> Result<User> {
        payload.validate().map_err(Error::validation)?;

        let role = match payload.role.as_deref() {
            Some(role) => role.parse::<UserRole>().map_err(|_| {
                Error::validation(ValidationErrors::single(
                    "role",
                    Constraint::OneOf(UserRole::NAMES).message("role"),
                ))
            })?,
            None => UserRole::default(),
        };

        let password = payload.password.unwrap_or_default();
        let password_hash = self
            .hasher
            .hash(&password)
            .map_err(|e| Error::internal("Failed to process password").with_source(e))?;

        let new_user = NewUser {
            email: payload.email.unwrap_or_default().trim().to_owned(),
            password_hash,
            full_name: payload.full_name.unwrap_or_default().trim().to_owned(),
            age: payload.age.unwrap_or_default(),
            occupation: payload.occupation.unwrap_or_default().trim().to_owned(),
            role,
        };

        let user = self.store.create_user(new_user).await.map_err(|error| {
            match error.conflict() {
                Some(ConstraintViolation::User(UserConstraints::EmailUnique)) => {
                    Error::conflict("Email already registered")
                }
                _ => storage_error("Failed to register user")(error),
            }
        })?;

        tracing::info!(
            target: TRACING_TARGET_SERVICE,
            user_id = user.id,
            role = %user.role,
            "user registered"
        );

        Ok(user)
    }

    /// Checks credentials and issues a session token.
    ///
    /// Unknown emails, wrong passwords and lookup failures are all reported as
    /// the same invalid credentials error.
    pub async fn login(&self, payload: LoginPayload) -> Result<LoginSession> {
        let email = payload.email.as_deref().map(str::trim).unwrap_or_default();
        let password = payload.password.as_deref().unwrap_or_default();

        if email.is_empty() || password.is_empty() {
            return Err(Error::validation(ValidationErrors::single(
                "credentials",
                "Email and password are required",
            )));
        }

        let user = match self.store.find_user_by_email(email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVICE,
                    "login attempt with unknown email"
                );
                self.hasher.verify_dummy(password);
                return Err(Error::invalid_credentials());
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_SERVICE,
                    error = %error,
                    "failed to look up user by email"
                );
                self.hasher.verify_dummy(password);
                return Err(Error::invalid_credentials().with_source(error));
            }
        };

        if !self.hasher.verify(&user.password_hash, password) {
            tracing::warn!(
                target: TRACING_TARGET_SERVICE,
                user_id = user.id,
                "login attempt with incorrect password"
            );
            return Err(Error::invalid_credentials());
        }

        let token = self.tokens.issue(user.id, user.role).map_err(|e| {
            Error::internal("Failed to generate authentication token").with_source(e)
        })?;

        tracing::info!(
            target: TRACING_TARGET_SERVICE,
            user_id = user.id,
            role = %user.role,
            "user logged in"
        );

        Ok(LoginSession { token, user })
    }
}
