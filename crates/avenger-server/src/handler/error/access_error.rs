//! Access policy rejection to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::service::AccessDenied;

impl From<AccessDenied> for HttpError<'static> {
    fn from(denied: AccessDenied) -> Self {
        let kind = match denied {
            AccessDenied::MissingToken => ErrorKind::MissingAuthToken,
            AccessDenied::InvalidFormat => ErrorKind::MalformedAuthToken,
            AccessDenied::EmptyToken => ErrorKind::EmptyAuthToken,
            AccessDenied::InvalidToken(_) => ErrorKind::InvalidAuthToken,
            AccessDenied::Forbidden => ErrorKind::Forbidden,
        };

        kind.with_context(denied.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::service::TokenError;

    #[test]
    fn unauthenticated_before_forbidden() {
        let unauthenticated = [
            AccessDenied::MissingToken,
            AccessDenied::InvalidFormat,
            AccessDenied::EmptyToken,
            AccessDenied::InvalidToken(TokenError::Expired),
        ];

        for denied in unauthenticated {
            let error = HttpError::from(denied);
            assert_eq!(error.kind().status_code(), StatusCode::UNAUTHORIZED);
        }

        let error = HttpError::from(AccessDenied::Forbidden);
        assert_eq!(error.kind().status_code(), StatusCode::FORBIDDEN);
    }
}
