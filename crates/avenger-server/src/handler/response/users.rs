use avenger_postgres::model;
use avenger_postgres::types::UserRole;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::service::LoginSession;

/// Registered user; the password hash is never included.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub age: i32,
    pub occupation: String,
    pub role: UserRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<model::User> for User {
    fn from(user: model::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            age: user.age,
            occupation: user.occupation,
            role: user.role,
            created_at: user.created_at.into(),
            updated_at: user.updated_at.into(),
        }
    }
}

/// User summary embedded in a login response.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
}

/// Successful login: signed token and user summary.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Login {
    pub token: String,
    pub user: UserSummary,
}

impl From<LoginSession> for Login {
    fn from(session: LoginSession) -> Self {
        Self {
            token: session.token,
            user: UserSummary {
                id: session.user.id,
                email: session.user.email,
                full_name: session.user.full_name,
                role: session.user.role,
            },
        }
    }
}
