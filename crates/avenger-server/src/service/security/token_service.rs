//! Signed session tokens carrying identity claims.
//!
//! Tokens are HMAC-signed JWTs holding the user id and role, valid for
//! [`TOKEN_TTL`] from issuance. No token state is kept on the server.

use std::fmt;
use std::sync::Arc;

use avenger_postgres::types::UserRole;
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::service::AuthConfig;
use crate::utility::tracing_targets::TRACING_TARGET_TOKEN_SERVICE;

/// Lifetime of an issued token.
pub const TOKEN_TTL: SignedDuration = SignedDuration::from_hours(2);

/// Secret used when none is configured.
const FALLBACK_SECRET: &str = "default-secret";

/// Identity claims encoded into every session token.
///
/// Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Identifier of the authenticated user.
    pub user_id: i32,
    pub role: UserRole,
    /// Issued at.
    pub iat: i64,
    /// Not before.
    pub nbf: i64,
    /// Expires at; the token is invalid at and after this instant.
    pub exp: i64,
}

impl AuthClaims {
    /// Creates claims issued at `issued_at` (Unix seconds).
    pub fn new(user_id: i32, role: UserRole, issued_at: i64) -> Self {
        Self {
            user_id,
            role,
            iat: issued_at,
            nbf: issued_at,
            exp: issued_at + TOKEN_TTL.as_secs(),
        }
    }

    /// Returns whether the claims are expired at `now` (Unix seconds).
    #[inline]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// Token validation and signing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Not a well-formed HMAC-signed token.
    #[error("malformed token")]
    Malformed,
    /// The signature does not match the configured secret.
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    /// Signing a new token failed.
    #[error("token encoding failed")]
    Encoding,
}

/// Issues and validates session tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    inner: Arc<TokenServiceInner>,
}

struct TokenServiceInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a token service signing with `secret`.
    ///
    /// An absent or empty secret falls back to an insecure built-in default and
    /// logs a warning.
    pub fn new(secret: Option<&str>) -> Self {
        let secret = match secret.filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!(
                    target: TRACING_TARGET_TOKEN_SERVICE,
                    "JWT_SECRET is not set, falling back to an insecure default secret"
                );
                FALLBACK_SECRET
            }
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf"]);

        let inner = TokenServiceInner {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Creates a token service from the authentication configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_deref())
    }

    /// Issues a token for the user, valid from now for [`TOKEN_TTL`].
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] if signing fails.
    pub fn issue(&self, user_id: i32, role: UserRole) -> Result<String, TokenError> {
        self.issue_at(user_id, role, Timestamp::now().as_second())
    }

    /// Issues a token whose claims start at `issued_at` (Unix seconds).
    pub fn issue_at(
        &self,
        user_id: i32,
        role: UserRole,
        issued_at: i64,
    ) -> Result<String, TokenError> {
        let claims = AuthClaims::new(user_id, role, issued_at);
        let header = Header::new(Algorithm::HS256);

        jsonwebtoken::encode(&header, &claims, &self.inner.encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_TOKEN_SERVICE,
                error = %e,
                "failed to sign session token"
            );
            TokenError::Encoding
        })
    }

    /// Validates a token and returns its claims.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Malformed`] for undecodable tokens and non-HMAC algorithms
    /// - [`TokenError::BadSignature`] when the signature does not verify
    /// - [`TokenError::Expired`] when `exp` is at or before the current time
    pub fn validate(&self, token: &str) -> Result<AuthClaims, TokenError> {
        let data = jsonwebtoken::decode::<AuthClaims>(
            token,
            &self.inner.decoding_key,
            &self.inner.validation,
        )
        .map_err(|e| {
            let error = match e.kind() {
                JwtErrorKind::InvalidSignature => TokenError::BadSignature,
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            };

            tracing::debug!(
                target: TRACING_TARGET_TOKEN_SERVICE,
                error = %e,
                "session token rejected"
            );
            error
        })?;

        let claims = data.claims;
        if claims.is_expired_at(Timestamp::now().as_second()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithms", &self.inner.validation.algorithms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;

    #[test]
    fn issue_and_validate_round_trip() -> anyhow::Result<()> {
        let service = TokenService::new(Some("test-secret"));
        let token = service.issue(7, UserRole::Superadmin)?;

        let claims = service.validate(&token)?;
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.role, UserRole::Superadmin);
        assert_eq!(claims.exp - claims.iat, 7200);
        assert_eq!(claims.nbf, claims.iat);

        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> anyhow::Result<()> {
        let service = TokenService::new(Some("test-secret"));
        let three_hours_ago = Timestamp::now().as_second() - 3 * 3600;
        let token = service.issue_at(1, UserRole::Admin, three_hours_ago)?;

        assert_eq!(service.validate(&token), Err(TokenError::Expired));
        Ok(())
    }

    #[test]
    fn expiry_is_inclusive() {
        let claims = AuthClaims::new(1, UserRole::Admin, 1_000);
        assert!(!claims.is_expired_at(1_000 + 7199));
        assert!(claims.is_expired_at(1_000 + 7200));
    }

    #[test]
    fn wrong_secret_is_bad_signature() -> anyhow::Result<()> {
        let issuer = TokenService::new(Some("secret-a"));
        let verifier = TokenService::new(Some("secret-b"));
        let token = issuer.issue(1, UserRole::Admin)?;

        assert_eq!(verifier.validate(&token), Err(TokenError::BadSignature));
        Ok(())
    }

    #[test]
    fn non_hmac_algorithm_is_malformed() {
        let service = TokenService::new(Some("test-secret"));
        let now = Timestamp::now().as_second();

        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"user_id":1,"role":"superadmin","iat":{now},"nbf":{now},"exp":{}}}"#,
            now + 3600
        ));
        let signature = URL_SAFE_NO_PAD.encode("not-a-signature");
        let token = format!("{header}.{payload}.{signature}");

        assert_eq!(service.validate(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn garbage_is_malformed() {
        let service = TokenService::new(Some("test-secret"));
        assert_eq!(service.validate("not.a.jwt"), Err(TokenError::Malformed));
        assert_eq!(service.validate(""), Err(TokenError::Malformed));
    }

    #[test]
    fn missing_secret_falls_back_to_default() -> anyhow::Result<()> {
        let fallback = TokenService::new(None);
        let explicit = TokenService::new(Some("default-secret"));
        let empty = TokenService::new(Some(""));

        let token = fallback.issue(3, UserRole::Admin)?;
        assert!(explicit.validate(&token).is_ok());
        assert!(empty.validate(&token).is_ok());

        Ok(())
    }
}
