//! Service layer error types and utilities.
//!
//! Resource services report failures through [`Error`], which carries a
//! category ([`ErrorKind`]), a message that is safe to show to clients, an
//! optional field-level validation map, and an optional source error that is
//! only ever written to logs.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use crate::validation::ValidationErrors;

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error kind enumeration for categorizing service layer errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Payload failed semantic validation.
    Validation,
    /// Login with an unknown email or a wrong password.
    InvalidCredentials,
    /// Point lookup, update or delete of an id that does not exist.
    NotFound,
    /// Unique constraint violation.
    Conflict,
    /// Configuration-related errors.
    Config,
    /// Storage or other internal failures.
    Internal,
}

impl ErrorKind {
    /// Returns the error kind as a string for categorization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::InvalidCredentials => "invalid_credentials",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Config => "config",
            Self::Internal => "internal_service",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service layer error with structured information.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    /// Client-safe message.
    message: Cow<'static, str>,
    errors: Option<ValidationErrors>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    #[inline]
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: None,
            source: None,
        }
    }

    /// Attaches a source error to this error.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attaches a field-to-message map to this error.
    #[inline]
    pub fn with_errors(mut self, errors: ValidationErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Returns the error kind.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field-level errors, if any.
    #[must_use]
    #[inline]
    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }

    /// Consumes the error, returning its message and field-level errors.
    pub fn into_parts(self) -> (ErrorKind, Cow<'static, str>, Option<ValidationErrors>) {
        (self.kind, self.message, self.errors)
    }

    /// Creates a validation error with the standard message.
    pub fn validation(errors: ValidationErrors) -> Self {
        Self::new(ErrorKind::Validation, "Validation failed").with_errors(errors)
    }

    /// Creates an invalid credentials error.
    #[inline]
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid credentials")
    }

    /// Creates a not found error.
    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Creates a conflict error.
    #[inline]
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Creates a new configuration error.
    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Creates a new internal service error.
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = Error::not_found("Inventory not found");
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), "Inventory not found");
        assert!(error.errors().is_none());
    }

    #[test]
    fn test_validation_error_carries_map() {
        let errors = ValidationErrors::single("name", "name is required");
        let error = Error::validation(errors);

        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.message(), "Validation failed");
        assert_eq!(
            error.errors().and_then(|e| e.message("name")),
            Some("name is required")
        );
    }

    #[test]
    fn test_error_with_source() {
        let source = std::io::Error::other("connection reset");
        let error = Error::internal("Failed to retrieve inventories").with_source(source);

        assert!(StdError::source(&error).is_some());
        assert!(!error.message().contains("connection reset"));
    }

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::Validation.as_str(), "validation");
        assert_eq!(ErrorKind::Conflict.as_str(), "conflict");
        assert_eq!(ErrorKind::Internal.as_str(), "internal_service");
    }
}
