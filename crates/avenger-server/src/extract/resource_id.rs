//! Positive integer resource identifier taken from the `{id}` path segment.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::reject::Path;
use super::reject::enhanced_path::invalid_id;
use crate::handler::Error;

/// A strictly positive resource identifier.
///
/// Non-numeric, zero and negative values are rejected with 400 before any
/// handler code runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i32);

impl ResourceId {
    /// Parses a raw path segment.
    pub fn parse(segment: &str) -> Option<Self> {
        segment
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .map(Self)
    }

    /// Returns the identifier.
    #[inline]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state).await?;
        Self::parse(&segment).ok_or_else(|| invalid_id().with_context(format!("id: {segment}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_integers_only() {
        assert_eq!(ResourceId::parse("7"), Some(ResourceId(7)));
        assert_eq!(ResourceId::parse("0"), None);
        assert_eq!(ResourceId::parse("-3"), None);
        assert_eq!(ResourceId::parse("abc"), None);
        assert_eq!(ResourceId::parse("1.5"), None);
        assert_eq!(ResourceId::parse("99999999999"), None);
    }
}
