//! Service error to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::ErrorKind as ServiceErrorKind;
use crate::utility::tracing_targets::TRACING_TARGET_HANDLER;

impl From<crate::Error> for HttpError<'static> {
    fn from(error: crate::Error) -> Self {
        let kind = match error.kind() {
            ServiceErrorKind::Validation => ErrorKind::BadRequest,
            ServiceErrorKind::InvalidCredentials => ErrorKind::Unauthorized,
            ServiceErrorKind::NotFound => ErrorKind::NotFound,
            ServiceErrorKind::Conflict => ErrorKind::Conflict,
            ServiceErrorKind::Config | ServiceErrorKind::Internal => {
                tracing::error!(
                    target: TRACING_TARGET_HANDLER,
                    error = %error,
                    source = ?std::error::Error::source(&error),
                    "request failed with an internal error"
                );
                ErrorKind::InternalServerError
            }
        };

        let (_, message, errors) = error.into_parts();
        let mut http_error = kind.with_message(message);
        if let Some(errors) = errors {
            http_error = http_error.with_errors(errors);
        }

        http_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrors;

    #[test]
    fn kinds_map_to_statuses() {
        let cases = [
            (
                crate::Error::validation(ValidationErrors::single("name", "name is required")),
                ErrorKind::BadRequest,
            ),
            (crate::Error::invalid_credentials(), ErrorKind::Unauthorized),
            (crate::Error::not_found("Recipe not found"), ErrorKind::NotFound),
            (
                crate::Error::conflict("Email already registered"),
                ErrorKind::Conflict,
            ),
            (
                crate::Error::internal("Failed to create recipe"),
                ErrorKind::InternalServerError,
            ),
        ];

        for (error, expected) in cases {
            let message = error.message().to_owned();
            let http_error = HttpError::from(error);
            assert_eq!(http_error.kind(), expected);
            assert_eq!(http_error.message(), Some(message.as_str()));
        }
    }

    #[test]
    fn validation_errors_are_carried() {
        let error = crate::Error::validation(ValidationErrors::single("code", "code is required"));
        let http_error = HttpError::from(error);
        assert_eq!(
            http_error.errors().and_then(|e| e.message("code")),
            Some("code is required")
        );
    }
}
