use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use deadpool::managed::{Hook, Pool};
use derive_more::{Deref, DerefMut};
use diesel_async::RunQueryDsl;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};

use super::custom_hooks;
use crate::{
    ConnectionPool, PgConfig, PgError, PgResult, PooledConnection, TRACING_TARGET_CLIENT,
    TRACING_TARGET_CONNECTION,
};

/// Connection pool status information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgPoolStatus {
    /// Maximum number of connections in the pool
    pub max_size: usize,
    /// Current number of connections in the pool
    pub size: usize,
    /// Number of idle connections
    pub available: usize,
    /// Number of requests waiting for connections
    pub waiting: usize,
}

impl PgPoolStatus {
    /// Returns the utilization ratio of the pool (0.0 to 1.0).
    #[inline]
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            self.size.saturating_sub(self.available) as f64 / self.max_size as f64
        }
    }

    /// Returns whether the pool is under pressure (high utilization or waiting requests).
    #[inline]
    pub fn is_under_pressure(&self) -> bool {
        self.waiting > 0 || self.utilization() > 0.8
    }
}

/// Outcome of a single idle-connection reaping pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReapOutcome {
    /// Connections closed because they outlived the maximum lifetime.
    pub expired: usize,
    /// Connections closed because they stayed idle too long.
    pub idle: usize,
    /// Connections closed because the idle set was above its limit.
    pub surplus: usize,
}

impl ReapOutcome {
    /// Returns the total number of closed connections.
    #[inline]
    pub fn total(&self) -> usize {
        self.expired + self.idle + self.surplus
    }
}

/// Database client that owns the bounded connection pool.
///
/// Cloning is cheap; all clones share the same pool.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a new database client with the provided configuration.
    ///
    /// Connections are established lazily on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CLIENT,
        fields(database = %config.connection_string_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        tracing::info!(target: TRACING_TARGET_CLIENT, "Initializing database client");

        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(custom_hooks::setup_callback);
        let manager = AsyncDieselConnectionManager::new_with_config(
            config.connection_string(),
            manager_config,
        );

        let pool = Pool::builder(manager)
            .max_size(config.max_connections as usize)
            .wait_timeout(Some(config.connect_timeout()))
            .create_timeout(Some(config.connect_timeout()))
            .recycle_timeout(Some(config.connect_timeout()))
            .runtime(deadpool::Runtime::Tokio1)
            .post_create(Hook::sync_fn(custom_hooks::post_create))
            .pre_recycle(Hook::sync_fn(custom_hooks::pre_recycle(
                config.conn_max_lifetime(),
            )))
            .build()
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET_CLIENT, error = %e, "Failed to create connection pool");
                PgError::Unexpected(format!("Failed to build connection pool: {}", e).into())
            })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Creates a client, verifies connectivity with `SELECT 1` and starts
    /// the background task that recycles idle connections.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built or the database is unreachable.
    #[tracing::instrument(skip(config), target = TRACING_TARGET_CLIENT)]
    pub async fn connect(config: PgConfig) -> PgResult<Self> {
        let this = Self::new(config)?;

        tracing::debug!(target: TRACING_TARGET_CLIENT, "Testing database connectivity");
        this.ping().await?;
        this.spawn_reaper();

        let config = this.config();
        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            max_connections = config.max_connections,
            max_idle_connections = config.max_idle_connections,
            conn_max_lifetime_secs = config.conn_max_lifetime_secs,
            conn_max_idle_secs = config.conn_max_idle_secs,
            "Database client initialized"
        );

        Ok(this)
    }

    /// Runs `SELECT 1` on a pooled connection.
    pub async fn ping(&self) -> PgResult<()> {
        #[derive(diesel::QueryableByName)]
        struct Ping {
            #[diesel(sql_type = diesel::sql_types::Integer)]
            #[allow(dead_code)]
            result: i32,
        }

        let mut conn = self.get_connection().await?;
        let _: Ping = diesel::sql_query("SELECT 1 AS result")
            .get_result(&mut **conn)
            .await
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET_CLIENT, error = %e, "Database connectivity test failed");
                PgError::from(e)
            })?;

        Ok(())
    }

    /// Gets a connection from the pool.
    ///
    /// Waits up to the configured connect timeout for an available connection.
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let start = Instant::now();
        let conn = self.inner.pool.get().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                elapsed = ?start.elapsed(),
                "Failed to acquire connection from pool"
            );
            PgError::from(e)
        })?;

        let elapsed = start.elapsed();
        if elapsed > Duration::from_millis(100) {
            tracing::warn!(
                target: TRACING_TARGET_CONNECTION,
                elapsed = ?elapsed,
                "Connection acquisition took longer than expected"
            );
        }

        Ok(PgConn { conn })
    }

    /// Gets the current pool status.
    #[inline]
    pub fn pool_status(&self) -> PgPoolStatus {
        let status = self.inner.pool.status();
        PgPoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Closes idle connections past their lifetime or idle limit and trims
    /// the idle set down to the configured maximum.
    ///
    /// Connections currently checked out are never touched.
    pub fn reap_idle_connections(&self) -> ReapOutcome {
        let config = &self.inner.config;
        let max_lifetime = config.conn_max_lifetime();
        let max_idle = config.conn_max_idle();
        let max_idle_count = config.max_idle_connections as usize;

        let expired = Cell::new(0);
        let idle = Cell::new(0);
        let surplus = Cell::new(0);
        let kept = Cell::new(0);

        let _ = self.inner.pool.retain(|_, metrics| {
            if metrics.age() >= max_lifetime {
                expired.set(expired.get() + 1);
                false
            } else if metrics.last_used() >= max_idle {
                idle.set(idle.get() + 1);
                false
            } else if kept.get() >= max_idle_count {
                surplus.set(surplus.get() + 1);
                false
            } else {
                kept.set(kept.get() + 1);
                true
            }
        });

        ReapOutcome {
            expired: expired.get(),
            idle: idle.get(),
            surplus: surplus.get(),
        }
    }

    /// Spawns the periodic reaping task on the current Tokio runtime.
    ///
    /// The task exits once the pool is closed.
    pub fn spawn_reaper(&self) {
        let client = self.clone();
        let period = self.inner.config.reap_interval();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            interval.tick().await;

            loop {
                interval.tick().await;
                if client.is_closed() {
                    break;
                }

                let outcome = client.reap_idle_connections();
                if outcome.total() > 0 {
                    tracing::debug!(
                        target: TRACING_TARGET_CONNECTION,
                        expired = outcome.expired,
                        idle = outcome.idle,
                        surplus = outcome.surplus,
                        "Closed pooled connections"
                    );
                }
            }

            tracing::debug!(target: TRACING_TARGET_CONNECTION, "Connection reaper stopped");
        });
    }

    /// Closes the pool: idle connections are dropped and new acquisitions fail.
    pub fn close(&self) {
        let status = self.pool_status();
        self.inner.pool.close();
        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            size = status.size,
            available = status.available,
            "Database connection pool closed"
        );
    }

    /// Returns whether the pool has been closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.inner.pool.is_closed()
    }

    /// Gets the database configuration used by this client.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool_status = self.pool_status();
        f.debug_struct("PgClient")
            .field("database", &self.inner.config.connection_string_masked())
            .field("pool_max_size", &pool_status.max_size)
            .field("pool_size", &pool_status.size)
            .field("pool_available", &pool_status.available)
            .field("pool_waiting", &pool_status.waiting)
            .finish()
    }
}

/// A pooled database connection.
///
/// Repository traits are implemented for the underlying connection and are
/// reachable through [`Deref`]. The connection returns to the pool on drop.
///
/// ```ignore
/// let mut conn = pg_client.get_connection().await?;
/// let inventory = conn.find_inventory_by_id(inventory_id).await?;
/// ```
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    /// Consumes the wrapper and returns the pooled connection.
    pub(crate) fn into_inner(self) -> PooledConnection {
        self.conn
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}
