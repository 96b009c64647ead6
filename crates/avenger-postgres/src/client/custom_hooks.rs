//! Includes all callbacks and hooks for [`diesel`] and [`deadpool`].

use std::time::{Duration, Instant};

use deadpool::managed::{HookError, HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::TRACING_TARGET_CONNECTION;

/// Masks the password value of a key/value connection string for safe logging.
pub(crate) fn mask_password(conninfo: &str) -> String {
    const KEY: &str = "password=";

    let Some(start) = conninfo.find(KEY).map(|pos| pos + KEY.len()) else {
        return conninfo.to_owned();
    };

    let rest = &conninfo[start..];
    let end = if rest.starts_with('\'') {
        let mut escaped = false;
        rest.char_indices()
            .skip(1)
            .find(|&(_, c)| {
                let closes = c == '\'' && !escaped;
                escaped = c == '\\' && !escaped;
                closes
            })
            .map(|(idx, _)| idx + 1)
            .unwrap_or(rest.len())
    } else {
        rest.find(' ').unwrap_or(rest.len())
    };

    format!("{}***{}", &conninfo[..start], &rest[end..])
}

/// Custom setup procedure used to establish a new connection.
///
/// See [`ManagerConfig`] and [`SetupCallback`] for more details.
///
/// [`ManagerConfig`]: diesel_async::pooled_connection::ManagerConfig
/// [`SetupCallback`]: diesel_async::pooled_connection::SetupCallback
pub fn setup_callback<C>(addr: &str) -> BoxFuture<'_, ConnectionResult<C>>
where
    C: AsyncConnection + 'static,
{
    let start = Instant::now();
    let masked_addr = mask_password(addr);

    tracing::debug!(
        target: TRACING_TARGET_CONNECTION,
        hook = "setup_callback",
        addr = %masked_addr,
        "Establishing new database connection"
    );

    async move {
        let result = C::establish(addr).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::debug!(
                    target: TRACING_TARGET_CONNECTION,
                    hook = "setup_callback",
                    elapsed_ms = elapsed.as_millis(),
                    "Database connection established"
                );
            }
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET_CONNECTION,
                    hook = "setup_callback",
                    addr = %masked_addr,
                    elapsed_ms = elapsed.as_millis(),
                    error = %err,
                    "Failed to establish database connection"
                );
            }
        }

        result
    }
    .boxed()
}

/// Custom hook called after a new connection has been established.
///
/// See [`PoolBuilder`] for more details.
///
/// [`PoolBuilder`]: deadpool::managed::PoolBuilder
pub fn post_create(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            hook = "post_create",
            created_at = ?metrics.created,
            "Connection is broken after creation"
        );
    }

    Ok(())
}

/// Builds the hook that runs before a pooled connection is handed out again.
///
/// Connections that are broken or older than `max_lifetime` are rejected,
/// which makes the pool discard them and hand out (or create) another one.
pub fn pre_recycle(
    max_lifetime: Duration,
) -> impl Fn(&mut AsyncPgConnection, &Metrics) -> HookResult<PoolError> + Send + Sync + 'static {
    move |conn, metrics| {
        if conn.is_broken() {
            tracing::warn!(
                target: TRACING_TARGET_CONNECTION,
                hook = "pre_recycle",
                recycle_count = metrics.recycle_count,
                "Discarding broken connection"
            );
            return Err(HookError::Message("connection is broken".into()));
        }

        if metrics.age() >= max_lifetime {
            tracing::debug!(
                target: TRACING_TARGET_CONNECTION,
                hook = "pre_recycle",
                age_secs = metrics.age().as_secs(),
                recycle_count = metrics.recycle_count,
                "Discarding connection past its maximum lifetime"
            );
            return Err(HookError::Message(
                "connection exceeded its maximum lifetime".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_plain_password() {
        assert_eq!(
            mask_password("host=db password=secret dbname=app"),
            "host=db password=*** dbname=app"
        );
    }

    #[test]
    fn masks_quoted_password() {
        assert_eq!(
            mask_password(r"host=db password='it\'s secret' dbname=app"),
            "host=db password=*** dbname=app"
        );
    }

    #[test]
    fn leaves_strings_without_password() {
        assert_eq!(mask_password("host=db dbname=app"), "host=db dbname=app");
    }
}
