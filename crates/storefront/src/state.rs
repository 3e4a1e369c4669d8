//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::catalog::{CatalogClient, CatalogError, ProductCatalog};
use crate::config::StorefrontConfig;
use crate::models::Session;
use crate::store::{Store, StoreError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog client: {0}")]
    Catalog(#[from] CatalogError),
    #[error("session restore: {0}")]
    Store(#[from] StoreError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the profile store, the session and the product catalog.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Store,
    session: Arc<Mutex<Session>>,
    catalog: ProductCatalog,
}

impl AppState {
    /// Create a new application state, restoring the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `StateError::Catalog` if the HTTP client cannot be built.
    /// Returns `StateError::Store` if the session cannot be read.
    pub fn new(config: StorefrontConfig, store: Store) -> Result<Self, StateError> {
        let client = CatalogClient::new(&config.catalog)?;
        let session = Session::restore(&store)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                session: Arc::new(Mutex::new(session)),
                catalog: ProductCatalog::new(client),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the profile store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &ProductCatalog {
        &self.inner.catalog
    }

    /// Lock the profile session.
    ///
    /// Identity-scoped requests hold this guard for their whole duration, so
    /// a login cannot interleave with a cart update of the previous identity.
    pub async fn session(&self) -> OwnedMutexGuard<Session> {
        Arc::clone(&self.inner.session).lock_owned().await
    }
}
