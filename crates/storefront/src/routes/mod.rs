//! HTTP route handlers for storefront.
//!
//! All routes speak JSON. Errors carry `{"error": "..."}` bodies.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Health check
//!
//! # Products
//! GET  /products                 - Filtered, sorted listing
//! POST /products/refresh         - Refetch the catalog
//! GET  /products/selected        - Fetch state of the last opened product
//! GET  /products/{id}            - Product detail
//! GET  /products/{id}/reviews    - Reviews, newest first
//! POST /products/{id}/reviews    - Submit a review
//!
//! # Cart
//! GET  /cart                     - Current cart
//! POST /cart/add                 - Add a product
//! POST /cart/remove              - Remove every entry of a product
//! POST /cart/clear               - Empty the cart
//!
//! # Orders (requires auth)
//! POST /checkout                 - Place an order
//! GET  /orders                   - Order history
//!
//! # Auth
//! POST /auth/signup              - Register and sign in
//! POST /auth/login               - Sign in
//! POST /auth/logout              - Sign out
//!
//! # Account (requires auth)
//! GET  /account                  - Account overview
//!
//! # Wishlist
//! GET  /wishlist                 - Wishlisted product ids
//! POST /wishlist/toggle          - Toggle a product
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/refresh", post(products::refresh))
        .route("/selected", get(products::selected))
        .route("/{id}", get(products::show))
        .route(
            "/{id}/reviews",
            get(products::reviews).post(products::add_review),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Orders
        .route("/checkout", post(cart::checkout))
        .route("/orders", get(cart::orders))
        // Account routes
        .route("/account", get(account::index))
        // Auth routes
        .nest("/auth", auth_routes())
        // Wishlist routes
        .nest("/wishlist", wishlist_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog source.
async fn health() -> &'static str {
    "ok"
}
