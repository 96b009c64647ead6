//! JSON extractor with envelope-shaped rejections.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json as AxumJson, Request};
use axum::response::{IntoResponse, Response};
use derive_more::{Deref, DerefMut, From};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};
use crate::utility::tracing_targets::TRACING_TARGET_HANDLER;
use crate::validation::ValidationErrors;

/// JSON extractor whose rejections render as the API's error envelope.
///
/// Any body that cannot be read or deserialized into `T` (syntax errors,
/// wrong field types, missing content type) yields 400 "Invalid request body".
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Creates a new [`Json`] wrapper around the provided value.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extractor = <AxumJson<T> as FromRequest<S>>::from_request(req, state).await;
        extractor.map(|x| Self::new(x.0)).map_err(Into::into)
    }
}

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    #[inline]
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl From<JsonRejection> for Error<'static> {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match rejection {
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_)
            | JsonRejection::BytesRejection(_) => ErrorKind::BadRequest,
            _ => ErrorKind::InternalServerError,
        };

        tracing::debug!(
            target: TRACING_TARGET_HANDLER,
            rejection = %rejection,
            "request body rejected"
        );

        if kind == ErrorKind::InternalServerError {
            return kind
                .with_message("Request processing failed")
                .with_context(sanitize_error_message(&rejection.body_text()));
        }

        kind.with_message("Invalid request body")
            .with_errors(ValidationErrors::single(
                "body",
                "Request body must be valid JSON",
            ))
            .with_context(sanitize_error_message(&rejection.body_text()))
    }
}

/// Keeps rejection details short enough for a log line.
fn sanitize_error_message(message: &str) -> String {
    let lines = message.lines().take(3).collect::<Vec<_>>();
    lines.join(" ").chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_truncates() {
        let long = "x".repeat(500);
        assert_eq!(sanitize_error_message(&long).len(), 200);
        assert_eq!(sanitize_error_message("a\nb\nc\nd"), "a b c");
    }
}
