//! Route gating on bearer tokens and roles.

use avenger_postgres::types::UserRole;

use super::{AuthClaims, TokenError, TokenService};
use crate::utility::tracing_targets::{
    TRACING_TARGET_AUTHENTICATION, TRACING_TARGET_AUTHORIZATION,
};

/// Scheme prefix expected in the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// Reasons a request is refused by the [`AccessPolicy`].
///
/// Variants are ordered by the sequence in which they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("missing authorization token")]
    MissingToken,
    /// Header present but without the `Bearer ` prefix.
    #[error("invalid authorization format")]
    InvalidFormat,
    /// Nothing but whitespace after the prefix.
    #[error("empty authorization token")]
    EmptyToken,
    #[error("invalid or expired token: {0}")]
    InvalidToken(TokenError),
    /// Authenticated, but the role is not in the required set.
    #[error("role not permitted")]
    Forbidden,
}

impl AccessDenied {
    /// Returns whether the rejection is an authentication failure rather than
    /// an authorization one.
    #[inline]
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, Self::Forbidden)
    }
}

/// Decides whether a request carrying an `Authorization` header may proceed.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    tokens: TokenService,
}

impl AccessPolicy {
    /// Creates a new policy validating tokens with `tokens`.
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }

    /// Returns the token service used by this policy.
    #[inline]
    pub fn token_service(&self) -> &TokenService {
        &self.tokens
    }

    /// Authorizes a request given its raw `Authorization` header value.
    ///
    /// An empty `required_roles` set admits any authenticated user; a token is
    /// required in every case.
    pub fn authorize(
        &self,
        header: Option<&str>,
        required_roles: &[UserRole],
    ) -> Result<AuthClaims, AccessDenied> {
        let header = header.ok_or(AccessDenied::MissingToken)?;
        let token = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AccessDenied::InvalidFormat)?
            .trim();

        if token.is_empty() {
            return Err(AccessDenied::EmptyToken);
        }

        let claims = self.tokens.validate(token).map_err(|e| {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                reason = %e,
                "bearer token rejected"
            );
            AccessDenied::InvalidToken(e)
        })?;

        if !required_roles.is_empty() && !required_roles.contains(&claims.role) {
            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                user_id = claims.user_id,
                role = %claims.role,
                "access denied: role not permitted"
            );
            return Err(AccessDenied::Forbidden);
        }

        Ok(claims)
    }
}
