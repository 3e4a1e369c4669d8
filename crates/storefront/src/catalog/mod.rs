//! Catalog source client.
//!
//! # Architecture
//!
//! - Read-only HTTP access to a DummyJSON-shaped catalog via `reqwest`
//! - Raw records are normalized by `shopfront_core::catalog`
//! - In-memory caching via `moka` for responses (TTL from configuration)
//! - [`ProductCatalog`] tracks the fetch lifecycle of the product list and
//!   the selected product with last-request-wins semantics
//!
//! # Failure Modes
//!
//! The `try_*` methods return [`CatalogError`]. The plain methods swallow the
//! error after logging it and report an empty list or an absent product, so
//! callers treat "nothing fetched" as a normal outcome.

mod cache;
pub mod tracker;

use std::sync::Arc;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use shopfront_core::{Product, ProductId, RawProduct, RawProductPage, normalize, normalize_detailed};

use crate::config::CatalogConfig;

use cache::{CacheKey, CacheValue};
pub use tracker::{FetchState, FetchTicket, FetchTracker};

/// Errors that can occur when talking to the catalog source.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("catalog returned HTTP {status}")]
    Status { status: u16 },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog source.
///
/// Cheaply cloneable; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    page_limit: u32,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                page_limit: config.page_limit,
                cache,
            }),
        })
    }

    /// GET `url` and return the body, or `None` for a 404.
    async fn get_text(&self, url: Url) -> Result<Option<String>, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        Ok(Some(body))
    }

    fn products_url(&self) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.join("products")?;
        url.query_pairs_mut()
            .append_pair("limit", &self.inner.page_limit.to_string());
        Ok(url)
    }

    fn product_url(&self, id: ProductId) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(&format!("products/{id}"))?)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch and normalize the product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn try_fetch_products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        let cache_key = CacheKey::Products {
            limit: self.inner.page_limit,
        };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = self.products_url()?;
        let Some(body) = self.get_text(url).await? else {
            return Err(CatalogError::Status { status: 404 });
        };

        let page: RawProductPage = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse catalog product page");
            e
        })?;
        let products = Arc::new(page.products.into_iter().map(normalize).collect::<Vec<_>>());
        debug!(count = products.len(), total = page.total, "Fetched products");

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Fetch and normalize one product, with specifications.
    ///
    /// Returns `Ok(None)` if the source has no such product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn try_fetch_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let url = self.product_url(id)?;
        let Some(body) = self.get_text(url).await? else {
            return Ok(None);
        };

        let raw: RawProduct = serde_json::from_str(&body)?;
        let product = normalize_detailed(raw);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(Some(product))
    }

    /// Product list, or an empty list if the fetch fails.
    pub async fn fetch_products(&self) -> Arc<Vec<Product>> {
        self.try_fetch_products().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Product list fetch failed");
            Arc::new(Vec::new())
        })
    }

    /// One product, or `None` if it is missing or the fetch fails.
    pub async fn fetch_product(&self, id: ProductId) -> Option<Product> {
        self.try_fetch_product(id).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, product_id = %id, "Product fetch failed");
            None
        })
    }

    /// Drop every cached response.
    pub fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
    }
}

// =============================================================================
// ProductCatalog
// =============================================================================

/// The in-memory product collection and its fetch lifecycle.
pub struct ProductCatalog {
    client: CatalogClient,
    list: FetchTracker<Arc<Vec<Product>>>,
    selected: FetchTracker<Option<Product>>,
}

impl ProductCatalog {
    #[must_use]
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            list: FetchTracker::new(),
            selected: FetchTracker::new(),
        }
    }

    #[must_use]
    pub const fn client(&self) -> &CatalogClient {
        &self.client
    }

    /// Fetch the product list and record the outcome. Returns the state
    /// after the fetch, which reflects a newer fetch if one finished first.
    pub async fn load(&self) -> FetchState<Arc<Vec<Product>>> {
        let ticket = self.list.begin();
        let outcome = self.client.try_fetch_products().await;
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "Product list fetch failed");
        }
        self.list.complete(ticket, outcome);
        self.list.state()
    }

    /// Refetch the list, bypassing cached responses.
    pub async fn refresh(&self) -> FetchState<Arc<Vec<Product>>> {
        self.client.invalidate_all();
        self.load().await
    }

    /// The current list state, fetching first if nothing was fetched yet
    /// or the last fetch failed.
    pub async fn products(&self) -> FetchState<Arc<Vec<Product>>> {
        match self.list.state() {
            FetchState::Idle | FetchState::Rejected(_) => self.load().await,
            state => state,
        }
    }

    /// Fetch one product and record it as the selected product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the fetch fails.
    pub async fn select(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        let ticket = self.selected.begin();
        let outcome = self.client.try_fetch_product(id).await;
        let recorded = outcome.as_ref().cloned().map_err(|e| e.to_string());
        self.selected.complete(ticket, recorded);
        outcome
    }

    /// State of the most recent [`select`](Self::select).
    #[must_use]
    pub fn selected(&self) -> FetchState<Option<Product>> {
        self.selected.state()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};

    use super::*;

    fn raw_product(id: u32) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": format!("Product {id}"),
            "description": "Fast. Light.",
            "category": "smartphones",
            "price": 12.5,
            "discountPercentage": 10,
            "rating": 4.7,
            "stock": 20,
            "brand": "Apple",
            "sku": "SKU-1",
            "thumbnail": "t.png",
            "images": ["a.png"]
        })
    }

    /// Serve a fake catalog on an ephemeral port, counting list requests.
    async fn serve(hits: Arc<AtomicUsize>) -> Url {
        async fn list(State(hits): State<Arc<AtomicUsize>>) -> Json<serde_json::Value> {
            hits.fetch_add(1, Ordering::SeqCst);
            Json(serde_json::json!({
                "products": [raw_product(1), raw_product(2)],
                "total": 2, "skip": 0, "limit": 100
            }))
        }

        async fn one(Path(id): Path<u32>) -> Result<Json<serde_json::Value>, StatusCode> {
            if id == 1 {
                Ok(Json(raw_product(1)))
            } else {
                Err(StatusCode::NOT_FOUND)
            }
        }

        let app = Router::new()
            .route("/products", get(list))
            .route("/products/{id}", get(one))
            .with_state(hits);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/")).unwrap()
    }

    fn client(base_url: Url) -> CatalogClient {
        CatalogClient::new(&CatalogConfig::new(base_url)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_products_normalizes_and_caches() {
        let hits = Arc::new(AtomicUsize::new(0));
        let client = client(serve(Arc::clone(&hits)).await);

        let products = client.try_fetch_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price.amount(), 1000);
        assert!(products[0].specifications.is_none());

        let _ = client.try_fetch_products().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        client.invalidate_all();
        let _ = client.try_fetch_products().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_product_detail_and_missing() {
        let client = client(serve(Arc::new(AtomicUsize::new(0))).await);

        let product = client.try_fetch_product(ProductId::new(1)).await.unwrap().unwrap();
        assert_eq!(product.specifications.unwrap().sku.as_deref(), Some("SKU-1"));
        assert!(client.try_fetch_product(ProductId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_source_degrades_to_empty() {
        // Nothing listens on port 9 of the loopback interface.
        let mut config = CatalogConfig::new(Url::parse("http://127.0.0.1:9/").unwrap());
        config.timeout = Duration::from_secs(2);
        let client = CatalogClient::new(&config).unwrap();

        assert!(client.fetch_products().await.is_empty());
        assert!(client.fetch_product(ProductId::new(1)).await.is_none());
        assert!(client.try_fetch_products().await.is_err());
    }

    #[tokio::test]
    async fn test_product_catalog_tracks_state() {
        let catalog = ProductCatalog::new(client(serve(Arc::new(AtomicUsize::new(0))).await));
        assert_eq!(catalog.list.state().status(), "idle");

        let state = catalog.products().await;
        assert_eq!(state.value().map(|p| p.len()), Some(2));

        let selected = catalog.select(ProductId::new(1)).await.unwrap();
        assert!(selected.is_some());
        assert_eq!(catalog.selected(), FetchState::Fulfilled(selected));

        assert!(catalog.select(ProductId::new(42)).await.unwrap().is_none());
        assert_eq!(catalog.selected(), FetchState::Fulfilled(None));
    }

    #[tokio::test]
    async fn test_failed_load_is_rejected_not_empty() {
        let mut config = CatalogConfig::new(Url::parse("http://127.0.0.1:9/").unwrap());
        config.timeout = Duration::from_secs(2);
        let catalog = ProductCatalog::new(CatalogClient::new(&config).unwrap());

        let state = catalog.load().await;
        assert_eq!(state.status(), "rejected");
        assert!(state.error().is_some());
    }
}
