//! Account route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use shopfront_core::{Email, Order, Price, Role};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::cart::CartService;
use crate::services::orders::OrderService;
use crate::services::wishlist::WishlistService;
use crate::state::AppState;

/// Account overview for the signed-in identity.
#[derive(Debug, Serialize)]
pub struct AccountView {
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub cart_count: usize,
    pub wishlist_count: usize,
    pub order_count: usize,
    pub total_spent: Price,
    /// Up to five most recent orders, newest first.
    pub recent_orders: Vec<Order>,
}

const RECENT_ORDERS: usize = 5;

/// Display the account overview.
#[instrument(skip(state, auth), fields(email = %auth.identity.email))]
pub async fn index(State(state): State<AppState>, auth: RequireAuth) -> Result<Json<AccountView>> {
    let store = state.store();
    let orders = OrderService::new(store).history(&auth.session)?;
    let cart_count = CartService::new(store).count(&auth.session)?;
    let wishlist_count = WishlistService::new(store).items(&auth.session)?.len();

    let RequireAuth { identity, .. } = auth;
    Ok(Json(AccountView {
        role: identity.display_role(),
        name: identity.name,
        email: identity.email,
        cart_count,
        wishlist_count,
        order_count: orders.len(),
        total_spent: orders.iter().map(Order::total).sum(),
        recent_orders: orders.into_iter().rev().take(RECENT_ORDERS).collect(),
    }))
}
