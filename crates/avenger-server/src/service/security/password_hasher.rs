//! Password hashing and verification using Argon2id.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};

use crate::utility::tracing_targets::TRACING_TARGET_PASSWORD_HASHER;

/// Well-formed Argon2id hash with the default cost parameters that no password
/// is expected to match. Verifying against it costs the same as a real check.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$YXZlbmdlci1kdW1teS1zYWx0$9+fdjSPPJoqvED0vb3MGGEeNbhFnaRtB7D/VZgf/r0Q";

/// Error returned when the hashing primitive fails.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct CredentialError(ArgonError);

/// Argon2id password hasher.
///
/// Every hash embeds a fresh random salt in its PHC string, so hashing the same
/// password twice yields different outputs that both verify.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    verifications: Arc<AtomicUsize>,
}

impl PasswordHasher {
    /// Creates a new instance of the [`PasswordHasher`] service.
    pub fn new() -> Self {
        let argon2 = Argon2::default();
        Self {
            argon2,
            verifications: Arc::default(),
        }
    }

    /// Hashes a password with a random salt and returns the PHC string.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] if the hashing primitive fails.
    pub fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    error = %e,
                    "password hashing operation failed"
                );
                CredentialError(e)
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored PHC hash.
    ///
    /// A mismatch and an unparseable stored hash both yield `false`; the latter
    /// is logged as a warning.
    pub fn verify(&self, stored_hash: &str, password: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(parsed_hash) => parsed_hash,
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    error = %e,
                    "invalid password hash format"
                );
                return false;
            }
        };

        self.verifications.fetch_add(1, Ordering::Relaxed);
        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => true,
            Err(ArgonError::Password) => {
                tracing::debug!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    "password verification failed"
                );
                false
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    error = %e,
                    "password verification system error"
                );
                false
            }
        }
    }

    /// Runs a full verification against a fixed hash and always returns `false`.
    ///
    /// Used when no stored hash exists for an account, so the caller spends the
    /// same Argon2 work as for a wrong password and timing does not reveal
    /// whether the account exists.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(DUMMY_HASH, password);
        false
    }

    /// Number of Argon2 verifications run by this hasher and its clones.
    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::Relaxed)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
