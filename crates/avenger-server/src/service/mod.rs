//! Application state, resource services and dependency injection.

mod config;
mod inventory;
mod recipe;
mod security;
pub mod store;
mod user;

use std::sync::Arc;

use avenger_postgres::PgClient;

pub use crate::service::config::{AuthConfig, ServiceConfig};
pub use crate::service::inventory::{InventoryPayload, InventoryService};
pub use crate::service::recipe::{RecipePayload, RecipeService};
pub use crate::service::security::{
    AccessDenied, AccessPolicy, AuthClaims, CredentialError, PasswordHasher, TOKEN_TTL,
    TokenError, TokenService,
};
use crate::service::store::{InventoryStore, RecipeStore, StoreError, UserStore};
pub use crate::service::user::{LoginPayload, LoginSession, RegisterPayload, UserService};
use crate::utility::tracing_targets::TRACING_TARGET_SERVICE;
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Maps a storage failure to an internal error carrying a client-safe message.
///
/// The storage error itself is only logged.
fn storage_error(message: &'static str) -> impl FnOnce(StoreError) -> Error {
    move |error| {
        tracing::error!(
            target: TRACING_TARGET_SERVICE,
            error = %error,
            "{message}"
        );
        Error::internal(message).with_source(error)
    }
}

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pub inventories: InventoryService,
    pub users: UserService,
    pub recipes: RecipeService,
    pub access_policy: AccessPolicy,
}

impl ServiceState {
    /// Wires every service to the given stores.
    pub fn new(
        inventory_store: Arc<dyn InventoryStore>,
        user_store: Arc<dyn UserStore>,
        recipe_store: Arc<dyn RecipeStore>,
        token_service: TokenService,
    ) -> Self {
        Self {
            inventories: InventoryService::new(inventory_store),
            users: UserService::new(user_store, PasswordHasher::new(), token_service.clone()),
            recipes: RecipeService::new(recipe_store),
            access_policy: AccessPolicy::new(token_service),
        }
    }

    /// Wires every service to a shared database client.
    pub fn from_pg_client(pg_client: PgClient, token_service: TokenService) -> Self {
        let pg_client = Arc::new(pg_client);
        Self::new(pg_client.clone(), pg_client.clone(), pg_client, token_service)
    }

    /// Initializes application state from configuration.
    ///
    /// Connects to the database and applies pending migrations.
    pub async fn from_config(config: &ServiceConfig) -> Result<(Self, PgClient)> {
        let pg_client = config.connect_postgres().await?;
        let state = Self::from_pg_client(pg_client.clone(), config.token_service());
        Ok((state, pg_client))
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(inventories: InventoryService);
impl_di!(users: UserService);
impl_di!(recipes: RecipeService);
impl_di!(access_policy: AccessPolicy);
