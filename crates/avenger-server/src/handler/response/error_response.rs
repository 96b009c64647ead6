use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::validation::ValidationErrors;

/// Error half of the response envelope: `{message, errors?}`.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Message safe for client display.
    pub message: Cow<'a, str>,
    /// Field-level details, omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new("Bad request", StatusCode::BAD_REQUEST);
    pub const CONFLICT: Self = Self::new("Resource already exists", StatusCode::CONFLICT);
    pub const EMPTY_AUTH_TOKEN: Self =
        Self::new("Empty authorization token", StatusCode::UNAUTHORIZED);
    pub const FORBIDDEN: Self = Self::new(
        "You don't have permission to access this resource",
        StatusCode::FORBIDDEN,
    );
    pub const INVALID_AUTH_TOKEN: Self =
        Self::new("Invalid or expired token", StatusCode::UNAUTHORIZED);
    pub const MALFORMED_AUTH_TOKEN: Self = Self::new(
        "Invalid authorization format. Use: Bearer <token>",
        StatusCode::UNAUTHORIZED,
    );
    pub const METHOD_NOT_ALLOWED: Self =
        Self::new("Method not allowed", StatusCode::METHOD_NOT_ALLOWED);
    pub const MISSING_AUTH_TOKEN: Self =
        Self::new("Missing authorization token", StatusCode::UNAUTHORIZED);
    pub const NOT_FOUND: Self = Self::new("Endpoint not found", StatusCode::NOT_FOUND);
    pub const UNAUTHORIZED: Self = Self::new("Invalid credentials", StatusCode::UNAUTHORIZED);

    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "Internal server error",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(message: &'a str, status: StatusCode) -> Self {
        Self {
            message: Cow::Borrowed(message),
            errors: None,
            status,
        }
    }

    /// Replaces the message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches field-level details.
    pub fn with_errors(mut self, errors: ValidationErrors) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_serialization() -> anyhow::Result<()> {
        let response = ErrorResponse::BAD_REQUEST
            .with_message("Invalid ID parameter")
            .with_errors(ValidationErrors::single("id", "ID must be a positive integer"));

        let json = serde_json::to_value(&response)?;
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Invalid ID parameter",
                "errors": {"id": "ID must be a positive integer"}
            })
        );
        Ok(())
    }

    #[test]
    fn errors_are_omitted_when_absent() -> anyhow::Result<()> {
        let json = serde_json::to_string(&ErrorResponse::NOT_FOUND)?;
        assert_eq!(json, r#"{"message":"Endpoint not found"}"#);
        Ok(())
    }
}
