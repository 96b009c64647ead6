//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - [`RouterAuthExt`] - bearer token and role enforcement
//! - [`RouterObservabilityExt`] - request logging with redacted credentials
//! - [`RouterRecoveryExt`] - panic and timeout recovery
//!
//! ```rust,no_run
//! use axum::Router;
//! use avenger_server::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
//!
//! let app: Router = Router::new()
//!     .with_recovery(&RecoveryConfig::default())
//!     .with_observability();
//! ```

mod authorization;
mod observability;
mod recovery;

pub use authorization::{RoleGuard, RouterAuthExt, require_roles};
pub use observability::{
    RouterObservabilityExt, create_sensitive_headers_layer, create_trace_layer,
};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
