#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use avenger_server::handler::{ROUTES, app};
use avenger_server::service::ServiceState;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "avenger_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "avenger_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "avenger_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = ?error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    cli.log_format.init_tracing();

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting avenger server"
    );

    cli.log();
    cli.validate()?;

    let (state, pg_client) = ServiceState::from_config(&cli.service)
        .await
        .context("failed to create service state")?;

    let router = app(state, &cli.recovery);
    log_routes();

    let served = server::serve(router, &cli.server).await;

    pg_client.close();

    if let Err(err) = &served {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error_code = err.error_code(),
            suggestion = err.suggestion(),
            "server failed"
        );
    }

    served.context("server terminated abnormally")?;

    Ok(())
}

/// Logs every registered route at debug level.
fn log_routes() {
    for (method, path) in ROUTES {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            method,
            path,
            "route registered"
        );
    }
}
