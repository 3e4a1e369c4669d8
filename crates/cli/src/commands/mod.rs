//! Command implementations.
//!
//! Every command runs against a [`Context`]: the profile store opened at the
//! data directory, the session restored from it, and a catalog client.
//! Output goes to the writer passed in, so commands can be tested.

pub mod account;
pub mod catalog;
pub mod community;
pub mod shop;

use std::io;
use std::path::Path;

use thiserror::Error;

use shopfront_core::{Product, ProductId};
use shopfront_storefront::catalog::{CatalogClient, CatalogError};
use shopfront_storefront::config::CatalogConfig;
use shopfront_storefront::models::Session;
use shopfront_storefront::services::auth::AuthError;
use shopfront_storefront::services::cart::CartError;
use shopfront_storefront::services::orders::OrderError;
use shopfront_storefront::services::reviews::ReviewBookError;
use shopfront_storefront::store::{Store, StoreError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Review(#[from] ReviewBookError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),

    /// No product with this id in the catalog.
    #[error("no product with id {0}")]
    ProductNotFound(ProductId),

    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

/// Profile handles shared by all commands.
pub struct Context {
    pub store: Store,
    pub session: Session,
    pub catalog: CatalogClient,
}

impl Context {
    /// Open the profile at `data_dir` and restore its session.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Store` if the directory cannot be opened or read.
    /// Returns `CommandError::Catalog` if the HTTP client cannot be built.
    pub fn open(data_dir: &Path, catalog: &CatalogConfig) -> Result<Self, CommandError> {
        let store = Store::open(data_dir)?;
        Self::with_store(store, catalog)
    }

    /// Build a context over an already opened store.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Store` if the session cannot be read.
    /// Returns `CommandError::Catalog` if the HTTP client cannot be built.
    pub fn with_store(store: Store, catalog: &CatalogConfig) -> Result<Self, CommandError> {
        let session = Session::restore(&store)?;
        let catalog = CatalogClient::new(catalog)?;
        Ok(Self {
            store,
            session,
            catalog,
        })
    }

    /// Fetch one product or fail with `ProductNotFound`.
    async fn product(&self, id: ProductId) -> Result<Product, CommandError> {
        self.catalog
            .try_fetch_product(id)
            .await?
            .ok_or(CommandError::ProductNotFound(id))
    }
}

/// One-line product summary.
fn product_line(product: &Product) -> String {
    let mut line = format!(
        "#{:<4} {}  {}",
        product.id.get(),
        product.name,
        product.price
    );
    if let Some(original) = product.original_price {
        line.push_str(&format!(" (was {original})"));
    }
    line.push_str(&format!(
        "  [{}] {} {:.1}/5  {}",
        product.category,
        product.brand,
        product.rating,
        product.availability().label()
    ));
    line
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::test_support::product;
    use super::*;

    #[test]
    fn test_product_line() {
        let line = product_line(&product(7, 1_499));
        assert!(line.starts_with("#7"));
        assert!(line.contains("₹1,499"));
        assert!(line.contains("[audio] Boat"));
        assert!(line.ends_with("In Stock"));
    }
}
