//! Credential hashing, session tokens and route access control.

mod access_policy;
mod password_hasher;
mod token_service;

pub use access_policy::{AccessDenied, AccessPolicy};
pub use password_hasher::{CredentialError, PasswordHasher};
pub use token_service::{AuthClaims, TOKEN_TTL, TokenError, TokenService};
