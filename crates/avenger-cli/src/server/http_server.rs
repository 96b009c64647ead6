//! HTTP server startup and lifecycle management.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::{Result, ServerError, TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP};
use crate::config::ServerConfig;

/// Binds to the configured address and serves `app` until `shutdown` resolves.
///
/// After the shutdown future resolves, the listener stops accepting and
/// in-flight requests get at most the configured grace period to finish.
pub async fn serve_http<F>(app: Router, server_config: &ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let server_addr = server_config.server_addr();

    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
        ServerError::bind_error(server_addr, err)
    })?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    let start_time = Instant::now();
    let result = serve_with_grace(listener, app, shutdown, server_config.shutdown_timeout()).await;
    let uptime_secs = start_time.elapsed().as_secs();

    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SHUTDOWN,
                uptime_secs,
                "Server shut down gracefully"
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %err,
                kind = ?err.kind(),
                uptime_secs,
                "Server encountered an error"
            );
            Err(ServerError::Runtime(err))
        }
    }
}

/// Runs the server; once `shutdown` fires, waits at most `grace` for draining.
async fn serve_with_grace<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());

    let signal = {
        let draining = draining.clone();
        async move {
            shutdown.await;
            tracing::info!(
                target: TRACING_TARGET_SHUTDOWN,
                grace_secs = grace.as_secs(),
                "Graceful shutdown initiated"
            );
            draining.notify_one();
        }
    };

    let server = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
    };

    let deadline = async move {
        draining.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result,
        () = deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SHUTDOWN,
                grace_secs = grace.as_secs(),
                "Grace period elapsed with requests still in flight"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use axum::routing::get;

    use super::*;

    fn loopback(port: u16) -> ServerConfig {
        ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port,
            shutdown_timeout: 1,
        }
    }

    #[tokio::test]
    async fn stops_when_shutdown_resolves() -> anyhow::Result<()> {
        let app = Router::new().route("/", get(|| async { "ok" }));
        let port = TcpListener::bind("127.0.0.1:0").await?.local_addr()?.port();

        serve_http(app, &loopback(port), async {}).await?;
        Ok(())
    }

    #[tokio::test]
    async fn reports_bind_failure() -> anyhow::Result<()> {
        let occupied = TcpListener::bind("127.0.0.1:0").await?;
        let port = occupied.local_addr()?.port();

        let result = serve_http(Router::new(), &loopback(port), async {}).await;
        assert!(matches!(result, Err(ServerError::BindError { .. })));
        Ok(())
    }
}
