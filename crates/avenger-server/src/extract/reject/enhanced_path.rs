//! Path extractor with envelope-shaped rejections.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path as AxumPath};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};
use crate::validation::ValidationErrors;

/// Path parameter extractor whose rejections render as the API's error envelope.
///
/// Every route parameter is a resource identifier, so a parameter that fails
/// to deserialize is reported as an invalid id.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
    /// Creates a new instance of [`Path`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner path parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let extractor =
            <AxumPath<T> as FromRequestParts<S>>::from_request_parts(parts, state).await;
        extractor.map(|x| Self(x.0)).map_err(Into::into)
    }
}

/// Returns the 400 error reported for a malformed resource identifier.
pub(crate) fn invalid_id() -> Error<'static> {
    ErrorKind::BadRequest
        .with_message("Invalid ID parameter")
        .with_errors(ValidationErrors::single("id", "ID must be a positive integer"))
}

impl From<PathRejection> for Error<'static> {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                invalid_id().with_context(err.body_text())
            }
            PathRejection::MissingPathParams(err) => invalid_id().with_context(err.body_text()),
            _ => ErrorKind::InternalServerError
                .with_message("Path processing failed")
                .with_context("Unexpected error occurred during path parameter processing"),
        }
    }
}
