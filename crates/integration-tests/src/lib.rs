//! Integration test harness for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! Nothing external is needed: [`spawn_catalog`] serves a fake
//! DummyJSON-shaped catalog and [`TestServer::spawn`] runs the real storefront
//! router on an ephemeral port over a temporary profile directory.
//!
//! # Test Categories
//!
//! - `storefront_api` - HTTP flows against a running storefront
//! - `profile` - services over the file-backed profile store

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;

use shopfront_storefront::config::{CatalogConfig, StorefrontConfig};
use shopfront_storefront::state::AppState;
use shopfront_storefront::store::Store;

/// A raw catalog record as DummyJSON would serve it.
#[must_use]
pub fn raw_product(id: u32, title: &str, price: f64, category: &str, brand: &str, rating: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title}. Built to last. Ships fast."),
        "category": category,
        "price": price,
        "discountPercentage": 0,
        "rating": rating,
        "stock": 25,
        "brand": brand,
        "sku": format!("SKU-{id}"),
        "thumbnail": format!("https://cdn.example.com/{id}.png"),
        "images": [],
        "tags": [category],
        "reviews": []
    })
}

/// The two-product catalog used across tests: a ₹1,000 phone rated 4.6 and
/// a ₹20,000 laptop rated 3.0.
#[must_use]
pub fn two_products() -> Vec<Value> {
    vec![
        raw_product(1, "Pocket Phone", 12.5, "smartphones", "A", 4.6),
        raw_product(2, "Desk Laptop", 250.0, "laptops", "B", 3.0),
    ]
}

/// Serve `products` as a DummyJSON-shaped catalog and return its base URL.
pub async fn spawn_catalog(products: Vec<Value>) -> Url {
    async fn list(State(products): State<Arc<Vec<Value>>>) -> Json<Value> {
        Json(json!({
            "products": products.as_slice(),
            "total": products.len(),
            "skip": 0,
            "limit": products.len()
        }))
    }

    async fn one(
        State(products): State<Arc<Vec<Value>>>,
        Path(id): Path<u64>,
    ) -> Result<Json<Value>, StatusCode> {
        products
            .iter()
            .find(|p| p["id"].as_u64() == Some(id))
            .cloned()
            .map(Json)
            .ok_or(StatusCode::NOT_FOUND)
    }

    let app = Router::new()
        .route("/products", get(list))
        .route("/products/{id}", get(one))
        .with_state(Arc::new(products));

    serve(app).await
}

async fn serve(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// A storefront running on an ephemeral port.
pub struct TestServer {
    pub base_url: Url,
    pub client: reqwest::Client,
    pub data_dir: TempDir,
}

impl TestServer {
    /// Start the storefront against the catalog at `catalog`.
    pub async fn spawn(catalog: Url) -> Self {
        let data_dir = TempDir::new().unwrap();
        let config = StorefrontConfig::local(data_dir.path(), CatalogConfig::new(catalog));
        let store = Store::open(data_dir.path()).unwrap();
        let state = AppState::new(config, store).unwrap();
        let base_url = serve(shopfront_storefront::app(state)).await;

        Self {
            base_url,
            client: reqwest::Client::new(),
            data_dir,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base_url.join(path.trim_start_matches('/')).unwrap()
    }

    /// GET `path`, returning the status and JSON body (`Null` if not JSON).
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    /// POST `body` as JSON to `path`.
    pub async fn post(&self, path: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }
}
