//! Bearer token and role enforcement for protected routes.

use avenger_postgres::types::UserRole;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;

use crate::handler::{Error, Result};
use crate::service::AccessPolicy;

/// State of the [`require_roles`] middleware: the policy plus the roles it admits.
///
/// An empty role set admits any authenticated caller.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    policy: AccessPolicy,
    roles: &'static [UserRole],
}

impl RoleGuard {
    /// Creates a guard admitting callers with one of `roles`.
    pub fn new(policy: AccessPolicy, roles: &'static [UserRole]) -> Self {
        Self { policy, roles }
    }

    /// Returns the admitted roles.
    #[inline]
    pub fn roles(&self) -> &'static [UserRole] {
        self.roles
    }
}

/// Rejects the request unless it carries a valid bearer token whose role is admitted.
///
/// Authentication failures (401) always take precedence over role failures (403).
/// On success the verified [`AuthClaims`] are inserted into the request extensions
/// for the [`Claims`] extractor.
///
/// [`AuthClaims`]: crate::service::AuthClaims
/// [`Claims`]: crate::extract::Claims
pub async fn require_roles(
    State(guard): State<RoleGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    // A header that is not valid visible ASCII cannot carry a bearer token.
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    let claims = guard
        .policy
        .authorize(header, guard.roles)
        .map_err(Error::from)?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extension trait for `axum::`[`Router`] to protect every route it holds.
pub trait RouterAuthExt<S> {
    /// Requires a valid bearer token with one of `roles` on every route of this router.
    ///
    /// Applied as a route layer, so unmatched paths still fall through to 404.
    fn with_required_roles(self, policy: AccessPolicy, roles: &'static [UserRole]) -> Self;
}

impl<S> RouterAuthExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_required_roles(self, policy: AccessPolicy, roles: &'static [UserRole]) -> Self {
        self.route_layer(from_fn_with_state(
            RoleGuard::new(policy, roles),
            require_roles,
        ))
    }
}
