//! Service configuration: database connection and token secret.

use avenger_postgres::{PgClient, PgConfig};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::service::{Error, Result, TokenService};
use crate::utility::tracing_targets::TRACING_TARGET_SERVICE;

/// Token signing configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AuthConfig {
    /// HMAC secret used to sign session tokens.
    ///
    /// An insecure built-in secret is used when unset.
    #[cfg_attr(
        feature = "config",
        arg(long = "jwt-secret", env = "JWT_SECRET", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub jwt_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "****"))
            .finish()
    }
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Database connection and pool settings.
    #[cfg_attr(feature = "config", command(flatten))]
    pub postgres: PgConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(default)]
    pub auth: AuthConfig,
}

impl ServiceConfig {
    /// Creates a new configuration.
    pub fn new(postgres: PgConfig, auth: AuthConfig) -> Self {
        Self { postgres, auth }
    }

    /// Connects to the database, verifies connectivity and applies pending migrations.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        let pg_client = PgClient::connect(self.postgres.clone())
            .await
            .map_err(|e| Error::config("Failed to connect to the database").with_source(e))?;

        let applied = pg_client
            .run_pending_migrations()
            .await
            .map_err(|e| Error::config("Failed to apply database migrations").with_source(e))?;

        tracing::info!(
            target: TRACING_TARGET_SERVICE,
            applied = applied.len(),
            "database schema is up to date"
        );

        Ok(pg_client)
    }

    /// Creates the token service from the configured secret.
    pub fn token_service(&self) -> TokenService {
        TokenService::from_config(&self.auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_secret() {
        let config = AuthConfig {
            jwt_secret: Some("top-secret".into()),
        };
        assert!(!format!("{config:?}").contains("top-secret"));
    }

    #[test]
    fn secret_is_not_serialized() -> anyhow::Result<()> {
        let config = AuthConfig {
            jwt_secret: Some("top-secret".into()),
        };
        let json = serde_json::to_string(&config)?;
        assert!(!json.contains("top-secret"));
        Ok(())
    }
}
