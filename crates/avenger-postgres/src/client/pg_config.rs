//! Database connection and pool configuration.
//!
//! Connection parameters are taken as discrete values rather than a URL and
//! rendered into a key/value connection string, so passwords containing URL
//! metacharacters need no escaping by the operator.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{PgClient, PgError, PgResult, TRACING_TARGET_CONNECTION};

/// Complete database configuration including connection parameters and pool settings.
///
/// ## Example
///
/// ```rust
/// use avenger_postgres::PgConfig;
///
/// let config = PgConfig::new("localhost", 5432, "avenger", "secret", "avenger");
/// assert!(config.validate().is_ok());
/// assert!(!config.connection_string_masked().contains("secret"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "database configurations must be used to create connection pools"]
pub struct PgConfig {
    /// Database server host name or address
    #[cfg_attr(feature = "config", arg(id = "pg_host", long = "pg-host", env = "PG_HOST"))]
    pub host: String,

    /// Database server port
    #[cfg_attr(feature = "config", arg(id = "pg_port", long = "pg-port", env = "PG_PORT"))]
    pub port: u16,

    /// Database user name
    #[cfg_attr(feature = "config", arg(long = "pg-user", env = "PG_USER"))]
    pub user: String,

    /// Database user password
    #[cfg_attr(
        feature = "config",
        arg(long = "pg-password", env = "PG_PASSWORD", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub password: String,

    /// Database name
    #[cfg_attr(feature = "config", arg(long = "pg-dbname", env = "PG_DBNAME"))]
    pub dbname: String,

    /// TLS negotiation mode (disable, prefer or require)
    #[cfg_attr(
        feature = "config",
        arg(long = "pg-sslmode", env = "PG_SSLMODE", default_value = "disable")
    )]
    pub sslmode: String,

    /// Maximum number of open connections in the pool (1-100)
    #[cfg_attr(
        feature = "config",
        arg(
            long = "pg-max-connections",
            env = "PG_MAX_CONNECTIONS",
            default_value = "25"
        )
    )]
    pub max_connections: u32,

    /// Maximum number of idle connections kept in the pool
    #[cfg_attr(
        feature = "config",
        arg(
            long = "pg-max-idle-connections",
            env = "PG_MAX_IDLE_CONNECTIONS",
            default_value = "5"
        )
    )]
    pub max_idle_connections: u32,

    /// Maximum lifetime of a pooled connection in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "pg-conn-max-lifetime-secs",
            env = "PG_CONN_MAX_LIFETIME_SECS",
            default_value = "300"
        )
    )]
    pub conn_max_lifetime_secs: u64,

    /// Maximum time a pooled connection may stay idle in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "pg-conn-max-idle-secs",
            env = "PG_CONN_MAX_IDLE_SECS",
            default_value = "600"
        )
    )]
    pub conn_max_idle_secs: u64,

    /// Timeout for establishing or acquiring a connection in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "pg-connect-timeout-secs",
            env = "PG_CONNECT_TIMEOUT_SECS",
            default_value = "30"
        )
    )]
    pub connect_timeout_secs: u64,
}

// Configuration constants
const MIN_CONNECTIONS: u32 = 1;
const MAX_CONNECTIONS: u32 = 100;

const MIN_LIFETIME_SECS: u64 = 1;
const MAX_LIFETIME_SECS: u64 = 86_400;

const MIN_CONNECT_TIMEOUT_SECS: u64 = 1;
const MAX_CONNECT_TIMEOUT_SECS: u64 = 300;

const SSL_MODES: &[&str] = &["disable", "prefer", "require"];

const MIN_REAP_INTERVAL: Duration = Duration::from_secs(1);
const MAX_REAP_INTERVAL: Duration = Duration::from_secs(60);

impl PgConfig {
    /// Creates a new database configuration with default pool settings.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        dbname: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            dbname: dbname.into(),
            sslmode: "disable".to_owned(),
            max_connections: 25,
            max_idle_connections: 5,
            conn_max_lifetime_secs: 300,
            conn_max_idle_secs: 600,
            connect_timeout_secs: 30,
        }
    }

    /// Returns the connection string passed to the driver.
    pub fn connection_string(&self) -> String {
        self.render(&self.password)
    }

    /// Returns the connection string with the password masked for safe logging.
    pub fn connection_string_masked(&self) -> String {
        self.render("***")
    }

    fn render(&self, password: &str) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={} connect_timeout={}",
            quote(&self.host),
            self.port,
            quote(&self.user),
            quote(password),
            quote(&self.dbname),
            quote(&self.sslmode),
            self.connect_timeout_secs,
        )
    }

    /// Returns the connection acquisition and creation timeout.
    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the maximum lifetime of a pooled connection.
    #[inline]
    pub fn conn_max_lifetime(&self) -> Duration {
        Duration::from_secs(self.conn_max_lifetime_secs)
    }

    /// Returns the maximum idle time of a pooled connection.
    #[inline]
    pub fn conn_max_idle(&self) -> Duration {
        Duration::from_secs(self.conn_max_idle_secs)
    }

    /// Returns how often idle connections are inspected for recycling.
    ///
    /// Half of the shorter recycling limit, bounded between one second and one minute.
    pub fn reap_interval(&self) -> Duration {
        (self.conn_max_lifetime().min(self.conn_max_idle()) / 2)
            .clamp(MIN_REAP_INTERVAL, MAX_REAP_INTERVAL)
    }

    /// Sets the maximum number of open connections.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets the maximum number of idle connections.
    pub fn with_max_idle_connections(mut self, max_idle_connections: u32) -> Self {
        self.max_idle_connections = max_idle_connections;
        self
    }

    /// Sets the connection lifetime and idle-time recycling limits in seconds.
    pub fn with_recycling_secs(mut self, max_lifetime: u64, max_idle: u64) -> Self {
        self.conn_max_lifetime_secs = max_lifetime;
        self.conn_max_idle_secs = max_idle;
        self
    }

    /// Sets the TLS negotiation mode.
    pub fn with_sslmode(mut self, sslmode: impl Into<String>) -> Self {
        self.sslmode = sslmode.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> PgResult<()> {
        if self.host.trim().is_empty() {
            return Err(PgError::Config("host cannot be empty".to_owned()));
        }

        if self.port == 0 {
            return Err(PgError::Config("port cannot be zero".to_owned()));
        }

        if self.user.trim().is_empty() {
            return Err(PgError::Config("user cannot be empty".to_owned()));
        }

        if self.dbname.trim().is_empty() {
            return Err(PgError::Config("dbname cannot be empty".to_owned()));
        }

        if !SSL_MODES.contains(&self.sslmode.as_str()) {
            return Err(PgError::Config(format!(
                "sslmode must be one of: {}",
                SSL_MODES.join(", ")
            )));
        }

        if !(MIN_CONNECTIONS..=MAX_CONNECTIONS).contains(&self.max_connections) {
            return Err(PgError::Config(format!(
                "max_connections must be between {} and {}",
                MIN_CONNECTIONS, MAX_CONNECTIONS
            )));
        }

        if self.max_idle_connections > self.max_connections {
            return Err(PgError::Config(
                "max_idle_connections cannot exceed max_connections".to_owned(),
            ));
        }

        for (name, secs) in [
            ("conn_max_lifetime_secs", self.conn_max_lifetime_secs),
            ("conn_max_idle_secs", self.conn_max_idle_secs),
        ] {
            if !(MIN_LIFETIME_SECS..=MAX_LIFETIME_SECS).contains(&secs) {
                return Err(PgError::Config(format!(
                    "{} must be between {} and {}",
                    name, MIN_LIFETIME_SECS, MAX_LIFETIME_SECS
                )));
            }
        }

        if !(MIN_CONNECT_TIMEOUT_SECS..=MAX_CONNECT_TIMEOUT_SECS)
            .contains(&self.connect_timeout_secs)
        {
            return Err(PgError::Config(format!(
                "connect_timeout_secs must be between {} and {}",
                MIN_CONNECT_TIMEOUT_SECS, MAX_CONNECT_TIMEOUT_SECS
            )));
        }

        Ok(())
    }

    /// Validates the configuration and builds a database client.
    ///
    /// The pool is created lazily; see [`PgClient::connect`] for a client
    /// that verifies connectivity up front.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub fn build(self) -> PgResult<PgClient> {
        self.validate()?;
        PgClient::new(self)
    }
}

/// Quotes a connection string value when it contains characters with special meaning.
fn quote(value: &str) -> String {
    let plain = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');

    if plain {
        return value.to_owned();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

impl fmt::Debug for PgConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("dbname", &self.dbname)
            .field("sslmode", &self.sslmode)
            .field("max_connections", &self.max_connections)
            .field("max_idle_connections", &self.max_idle_connections)
            .field("conn_max_lifetime_secs", &self.conn_max_lifetime_secs)
            .field("conn_max_idle_secs", &self.conn_max_idle_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PgConfig {
        PgConfig::new("localhost", 5432, "avenger", "secret", "avenger")
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.max_idle_connections, 5);
        assert_eq!(config.conn_max_lifetime(), Duration::from_secs(300));
        assert_eq!(config.conn_max_idle(), Duration::from_secs(600));
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.sslmode, "disable");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_connection_string() {
        assert_eq!(
            config().connection_string(),
            "host=localhost port=5432 user=avenger password=secret dbname=avenger \
             sslmode=disable connect_timeout=30"
        );
    }

    #[test]
    fn test_password_masking() {
        let config = config();
        let masked = config.connection_string_masked();
        assert!(masked.contains("password=***"));
        assert!(!masked.contains("secret"));
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn test_quoting() {
        let config = PgConfig::new("localhost", 5432, "avenger", "it's a pass", "avenger");
        assert!(
            config
                .connection_string()
                .contains(r"password='it\'s a pass'")
        );

        let empty = PgConfig::new("localhost", 5432, "avenger", "", "avenger");
        assert!(empty.connection_string().contains("password=''"));
    }

    #[test]
    fn test_reap_interval() {
        assert_eq!(config().reap_interval(), Duration::from_secs(60));

        let short = config().with_recycling_secs(4, 600);
        assert_eq!(short.reap_interval(), Duration::from_secs(2));

        let tiny = config().with_recycling_secs(1, 1);
        assert_eq!(tiny.reap_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_validation() {
        assert!(config().with_max_connections(0).validate().is_err());
        assert!(config().with_max_connections(101).validate().is_err());
        assert!(
            config()
                .with_max_connections(4)
                .with_max_idle_connections(5)
                .validate()
                .is_err()
        );
        assert!(config().with_recycling_secs(0, 600).validate().is_err());
        assert!(config().with_sslmode("verify-full").validate().is_err());
        assert!(config().with_sslmode("require").validate().is_ok());

        let mut missing_host = config();
        missing_host.host = "  ".to_owned();
        assert!(missing_host.validate().is_err());
    }
}
