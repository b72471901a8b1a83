//! Assembled client facade.
//!
//! Wires the object graph a caller would otherwise assemble by hand:
//! storage → token store → exchange → refresh coordinator → authenticated
//! client → session. One coordinator per facade, shared by the proactive
//! and reactive refresh paths.

use std::sync::Arc;

use bazaar_application::auth::{RefreshCoordinator, TokenStore};
use bazaar_application::ports::TokenStorage;
use bazaar_application::session::Session;

use crate::http::{ApiResult, ClientConfig, HttpTokenExchange, StorefrontClient};

/// The fully wired storefront client: typed endpoints plus session state.
pub struct Storefront {
    exchange: Arc<HttpTokenExchange>,
    client: Arc<StorefrontClient>,
    session: Arc<Session>,
}

impl Storefront {
    /// Builds the client stack over the given token storage.
    ///
    /// # Errors
    ///
    /// Returns an error if an underlying HTTP client cannot be built.
    pub fn connect(config: ClientConfig, storage: Arc<dyn TokenStorage>) -> ApiResult<Self> {
        let store = TokenStore::new(storage);
        let exchange = Arc::new(HttpTokenExchange::new(config.clone())?);
        let coordinator = Arc::new(RefreshCoordinator::new(store.clone(), exchange.clone()));
        let client = Arc::new(StorefrontClient::new(
            config,
            store.clone(),
            coordinator.clone(),
        )?);
        let session = Arc::new(Session::new(
            store,
            coordinator,
            exchange.clone(),
            client.clone(),
        ));
        Ok(Self {
            exchange,
            client,
            session,
        })
    }

    /// The authenticated API client.
    #[must_use]
    pub const fn client(&self) -> &Arc<StorefrontClient> {
        &self.client
    }

    /// The session and identity cache.
    #[must_use]
    pub const fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The anonymous token/registration client.
    #[must_use]
    pub const fn exchange(&self) -> &Arc<HttpTokenExchange> {
        &self.exchange
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront").finish_non_exhaustive()
    }
}
