//! Cart, checkout and order route handlers.
//!
//! Cart entries are full product snapshots; adding looks the product up in
//! the catalog first so the snapshot carries current price and badges.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopfront_core::{Order, Price, Product, ProductId, ShippingAddress};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{CurrentSession, RequireAuth};
use crate::services::cart::CartService;
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<Product>,
    pub count: usize,
    pub total: Price,
    pub total_display: String,
}

impl From<shopfront_core::Cart> for CartView {
    fn from(cart: shopfront_core::Cart) -> Self {
        let total = cart.total();
        Self {
            count: cart.len(),
            total,
            total_display: total.to_string(),
            items: cart.into_items(),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCart {
    pub product_id: ProductId,
}

/// Show the current cart. Guests always see an empty cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: CurrentSession) -> Result<Json<CartView>> {
    let cart = CartService::new(state.store()).cart(&session)?;
    Ok(Json(cart.into()))
}

/// Add `quantity` (default 1) snapshots of a product.
///
/// The session is locked only after the catalog lookup returns.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddToCart>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .client()
        .try_fetch_product(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let quantity = body.quantity.unwrap_or(1);
    let session = state.session().await;
    let cart = CartService::new(state.store()).add_quantity(&session, product, quantity)?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", &body.product_id.to_string())]),
    );
    Ok(Json(cart.into()))
}

/// Remove every entry of a product.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(body): Json<RemoveFromCart>,
) -> Result<Json<CartView>> {
    let cart = CartService::new(state.store()).remove_item(&session, body.product_id)?;
    Ok(Json(cart.into()))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: CurrentSession) -> Result<Json<CartView>> {
    CartService::new(state.store()).clear(&session)?;
    Ok(Json(shopfront_core::Cart::new().into()))
}

/// Place an order for the current cart.
#[instrument(skip(state, auth, address))]
pub async fn checkout(
    State(state): State<AppState>,
    auth: RequireAuth,
    Json(address): Json<ShippingAddress>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.store()).place_order(&auth.session, address)?;
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", &order.id().to_string())]),
    );
    Ok(Json(order))
}

/// Order history of the signed-in identity, oldest first.
#[instrument(skip(state, auth))]
pub async fn orders(State(state): State<AppState>, auth: RequireAuth) -> Result<Json<Vec<Order>>> {
    Ok(Json(OrderService::new(state.store()).history(&auth.session)?))
}
