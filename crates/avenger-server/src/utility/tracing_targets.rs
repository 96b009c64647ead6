//! Centralized tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters.

/// Token validation and bearer header parsing.
pub const TRACING_TARGET_AUTHENTICATION: &str = "avenger_server::authentication";

/// Role checks on protected routes.
pub const TRACING_TARGET_AUTHORIZATION: &str = "avenger_server::authorization";

/// Error recovery including middleware errors and request failures.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "avenger_server::recovery::error";

/// Panic recovery including handler panics.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "avenger_server::recovery::panic";

/// Password hashing and verification operations.
pub const TRACING_TARGET_PASSWORD_HASHER: &str = "avenger_server::password_hasher";

/// Token signing and verification.
pub const TRACING_TARGET_TOKEN_SERVICE: &str = "avenger_server::token_service";

/// Payload rule evaluation.
pub const TRACING_TARGET_VALIDATION: &str = "avenger_server::validation";

/// Resource service operations and storage error mapping.
pub const TRACING_TARGET_SERVICE: &str = "avenger_server::service";

/// Handler-level events.
pub const TRACING_TARGET_HANDLER: &str = "avenger_server::handler";
