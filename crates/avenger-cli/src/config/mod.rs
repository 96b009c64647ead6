//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig       # Host, port, shutdown grace period
//! ├── recovery: RecoveryConfig   # Per-request timeout
//! ├── service: ServiceConfig     # Database, pool, token secret
//! └── log_format: LogFormat      # Human-readable or JSON logs
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables,
//! optionally loaded from a `.env` file. Use `--help` to see all available options.
//!
//! ```bash
//! PG_HOST=localhost PG_PORT=5432 PG_USER=avenger PG_PASSWORD=secret PG_DBNAME=avenger \
//!     JWT_SECRET=change-me PORT=8080 avenger
//! ```

mod logging;
mod server;

use std::process;

use anyhow::Context;
use avenger_server::middleware::RecoveryConfig;
use avenger_server::service::ServiceConfig;
use clap::Parser;
pub use logging::LogFormat;
pub use server::ServerConfig;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "avenger")]
#[command(about = "Avenger inventory, user and recipe API server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Request timeout configuration.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Database and authentication configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so its values act
    /// as environment defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.recovery
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid request timeout")?;
        self.service
            .postgres
            .validate()
            .context("invalid database configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            "Build information"
        );

        self.server.log();

        let postgres = &self.service.postgres;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            url = %postgres.connection_string_masked(),
            max_connections = postgres.max_connections,
            max_idle_connections = postgres.max_idle_connections,
            conn_max_lifetime_secs = postgres.conn_max_lifetime_secs,
            conn_max_idle_secs = postgres.conn_max_idle_secs,
            request_timeout_secs = self.recovery.request_timeout,
            jwt_secret_configured = self.service.auth.jwt_secret.is_some(),
            "Service configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    const DB_ARGS: &[&str] = &[
        "avenger",
        "--pg-host",
        "localhost",
        "--pg-port",
        "5432",
        "--pg-user",
        "avenger",
        "--pg-password",
        "secret",
        "--pg-dbname",
        "avenger",
    ];

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_with_defaults() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(DB_ARGS)?;

        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.server.shutdown_timeout, 30);
        assert_eq!(cli.recovery.request_timeout, 15);
        assert_eq!(cli.service.postgres.max_connections, 25);
        assert_eq!(cli.log_format, LogFormat::Text);
        cli.validate()?;
        Ok(())
    }

    #[test]
    fn parses_json_log_format() -> anyhow::Result<()> {
        let mut args = DB_ARGS.to_vec();
        args.extend(["--log-format", "json", "--request-timeout", "5"]);
        let cli = Cli::try_parse_from(args)?;

        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.recovery.request_timeout, 5);
        Ok(())
    }

    #[test]
    fn rejects_out_of_range_timeout() -> anyhow::Result<()> {
        let mut args = DB_ARGS.to_vec();
        args.extend(["--request-timeout", "0"]);
        let cli = Cli::try_parse_from(args)?;

        assert!(cli.validate().is_err());
        Ok(())
    }
}
