//! Claims of the authenticated caller.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use derive_more::Deref;

use crate::handler::{Error, ErrorKind};
use crate::service::AuthClaims;

/// Claims placed in the request extensions by the authorization middleware.
///
/// Extracting them on a route without that middleware is a server error.
#[derive(Debug, Clone, Deref)]
pub struct Claims(pub AuthClaims);

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthClaims>()
            .cloned()
            .map(Self)
            .ok_or_else(|| {
                ErrorKind::InternalServerError
                    .with_context("authorization middleware is not installed on this route")
            })
    }
}
