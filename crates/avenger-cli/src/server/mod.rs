//! HTTP server startup with graceful shutdown.

/// Tracing target for server startup events.
pub const TRACING_TARGET_STARTUP: &str = "avenger_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "avenger_cli::server::shutdown";

mod error;
mod http_server;
mod shutdown;

use axum::Router;
pub use error::{Result, ServerError};
pub use http_server::serve_http;
pub use shutdown::shutdown_signal;

use crate::config::ServerConfig;

/// Serves `app` until SIGINT or SIGTERM, then drains within the grace period.
pub async fn serve(app: Router, config: &ServerConfig) -> Result<()> {
    serve_http(app, config, shutdown_signal()).await
}
