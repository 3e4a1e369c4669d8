//! Wishlist route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopfront_core::ProductId;

use crate::error::Result;
use crate::middleware::CurrentSession;
use crate::services::wishlist::WishlistService;
use crate::state::AppState;

/// Wishlist display data.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<ProductId>,
}

/// Toggle request body.
#[derive(Debug, Deserialize)]
pub struct ToggleWishlist {
    pub product_id: ProductId,
}

/// Toggle response.
#[derive(Debug, Serialize)]
pub struct ToggleResult {
    pub product_id: ProductId,
    pub wishlisted: bool,
}

/// Wishlisted product ids, oldest first.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: CurrentSession) -> Result<Json<WishlistView>> {
    let items = WishlistService::new(state.store()).items(&session)?;
    Ok(Json(WishlistView { items }))
}

/// Add the product if absent, remove it if present.
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(body): Json<ToggleWishlist>,
) -> Result<Json<ToggleResult>> {
    let wishlisted = WishlistService::new(state.store()).toggle(&session, body.product_id)?;
    Ok(Json(ToggleResult {
        product_id: body.product_id,
        wishlisted,
    }))
}
