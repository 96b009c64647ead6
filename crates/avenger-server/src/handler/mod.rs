//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use avenger_server::handler::app;
//! use avenger_server::middleware::RecoveryConfig;
//! use avenger_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example(config: ServiceConfig) -> anyhow::Result<()> {
//! let (state, _pg_client) = ServiceState::from_config(&config).await?;
//! let router = app(state, &RecoveryConfig::default());
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod authentication;
mod error;
mod inventories;
mod recipes;
pub mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
use crate::service::ServiceState;

/// Method and path of every route served by [`routes`].
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/inventories"),
    ("POST", "/inventories"),
    ("GET", "/inventories/{id}"),
    ("PUT", "/inventories/{id}"),
    ("DELETE", "/inventories/{id}"),
    ("POST", "/register"),
    ("POST", "/login"),
    ("GET", "/recipes"),
    ("POST", "/recipes"),
    ("DELETE", "/recipes/{id}"),
];

#[inline]
async fn not_found() -> Response {
    ErrorKind::NotFound.into_response()
}

#[inline]
async fn method_not_allowed() -> Response {
    ErrorKind::MethodNotAllowed.into_response()
}

/// Returns a [`Router`] with every resource route and the error fallbacks.
pub fn routes(state: &ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(inventories::routes())
        .merge(authentication::routes())
        .merge(recipes::routes(state))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

/// Returns the complete application: routes, recovery and request logging.
pub fn app(state: ServiceState, recovery: &RecoveryConfig) -> Router {
    routes(&state)
        .with_recovery(recovery)
        .with_observability()
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;

    use axum::Router;
    use axum_test::TestServer;

    use crate::middleware::{RecoveryConfig, RouterRecoveryExt};
    use crate::service::store::memory::{
        MemoryInventoryStore, MemoryRecipeStore, MemoryUserStore,
    };
    use crate::service::store::{InventoryStore, RecipeStore, UserStore};
    use crate::service::{ServiceState, TokenService};

    /// Signing secret shared by test servers and test tokens.
    pub const TEST_SECRET: &str = "test-secret";

    /// Returns a new [`ServiceState`] over the given stores.
    pub fn create_test_state(
        inventories: Arc<dyn InventoryStore>,
        users: Arc<dyn UserStore>,
        recipes: Arc<dyn RecipeStore>,
    ) -> ServiceState {
        let tokens = TokenService::new(Some(TEST_SECRET));
        ServiceState::new(inventories, users, recipes, tokens)
    }

    /// Returns a new [`TestServer`] with the given router and state.
    pub fn create_test_server_with_router(
        router: impl Fn(&ServiceState) -> Router<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let app = router(&state)
            .with_recovery(&RecoveryConfig::default())
            .with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with the default router over the given stores.
    pub fn create_test_server_with_stores(
        inventories: Arc<dyn InventoryStore>,
        users: Arc<dyn UserStore>,
        recipes: Arc<dyn RecipeStore>,
    ) -> anyhow::Result<TestServer> {
        let state = create_test_state(inventories, users, recipes);
        create_test_server_with_router(super::routes, state)
    }

    /// Returns a new [`TestServer`] with the default router and empty stores.
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        create_test_server_with_stores(
            Arc::new(MemoryInventoryStore::new()),
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryRecipeStore::new()),
        )
    }

    mod fallbacks {
        use axum::http::StatusCode;
        use axum::routing::get;
        use serde_json::Value;

        use super::*;
        use crate::handler::routes;

        #[tokio::test]
        async fn unknown_path_is_not_found() -> anyhow::Result<()> {
            let server = create_test_server()?;

            let response = server.get("/nowhere").await;
            response.assert_status(StatusCode::NOT_FOUND);
            let body: Value = response.json();
            assert_eq!(body["message"], "Endpoint not found");
            assert!(body.get("data").is_none());
            assert!(body.get("errors").is_none());
            Ok(())
        }

        #[tokio::test]
        async fn wrong_method_is_not_allowed() -> anyhow::Result<()> {
            let server = create_test_server()?;

            let response = server.patch("/inventories").await;
            response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
            let body: Value = response.json();
            assert_eq!(body["message"], "Method not allowed");
            Ok(())
        }

        #[tokio::test]
        async fn handler_panic_is_recovered() -> anyhow::Result<()> {
            async fn explode() -> &'static str {
                panic!("boom")
            }

            let state = create_test_state(
                Arc::new(MemoryInventoryStore::new()),
                Arc::new(MemoryUserStore::new()),
                Arc::new(MemoryRecipeStore::new()),
            );
            let server = create_test_server_with_router(
                |state| routes(state).route("/explode", get(explode)),
                state,
            )?;

            let response = server.get("/explode").await;
            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            let body: Value = response.json();
            assert_eq!(body["message"], "Internal server error");

            server.get("/inventories").await.assert_status_ok();
            Ok(())
        }
    }
}
