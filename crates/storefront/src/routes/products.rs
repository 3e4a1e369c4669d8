//! Product route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopfront_core::query::{self, ALL_CATEGORIES};
use shopfront_core::{
    CatalogFilter, Price, PriceRange, Product, ProductId, Review, ReviewDraft, SortKey, brand_facet,
};

use crate::catalog::FetchState;
use crate::error::{AppError, Result};
use crate::services::reviews::ReviewBook;
use crate::state::AppState;

/// Listing query parameters.
///
/// `brand` takes a comma-separated list; a product matches any of them.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub sort: Option<String>,
}

impl ProductQuery {
    /// Build the filter and sort key.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an unknown sort key or an inverted
    /// price range.
    pub fn parse(&self) -> Result<(CatalogFilter, SortKey)> {
        let mut filter = CatalogFilter::new();

        if let Some(category) = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
        {
            filter = filter.with_category(category);
        }

        if let Some(brands) = &self.brand {
            for brand in brands.split(',').map(str::trim).filter(|b| !b.is_empty()) {
                filter = filter.with_brand(brand);
            }
        }

        if let Some(text) = &self.search {
            filter = filter.with_text(text.as_str());
        }

        match (self.min_price, self.max_price) {
            (None, None) => {}
            (min, Some(max)) => {
                let min = min.unwrap_or(0);
                if min > max {
                    return Err(AppError::Validation(format!(
                        "min_price {min} exceeds max_price {max}"
                    )));
                }
                filter = filter.with_price(PriceRange::between(min, max));
            }
            (Some(min), None) => filter = filter.with_price(PriceRange::at_least(min)),
        }

        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortKey::default(),
            Some(raw) => raw.parse().map_err(AppError::Validation)?,
        };

        Ok((filter, sort))
    }
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductListing {
    /// Fetch status of the underlying collection.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Size of the whole collection before filtering.
    pub total: usize,
    pub count: usize,
    pub sort: SortKey,
    pub brands: Vec<String>,
    pub price_ranges: Vec<PriceRangeView>,
    pub products: Vec<Product>,
}

/// A preset price range with its label.
#[derive(Debug, Serialize)]
pub struct PriceRangeView {
    pub label: String,
    pub min: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Price>,
}

impl From<PriceRange> for PriceRangeView {
    fn from(range: PriceRange) -> Self {
        Self {
            label: range.label(),
            min: range.min,
            max: range.max,
        }
    }
}

fn listing(state: &FetchState<Arc<Vec<Product>>>, params: &ProductQuery) -> Result<ProductListing> {
    let (filter, sort) = params.parse()?;
    let all: &[Product] = state.value().map_or(&[][..], |products| products.as_slice());
    let products: Vec<Product> = query::run(all, &filter, sort).into_iter().cloned().collect();

    Ok(ProductListing {
        status: state.status(),
        error: state.error().map(str::to_string),
        total: all.len(),
        count: products.len(),
        sort,
        brands: brand_facet(all).into_iter().map(str::to_string).collect(),
        price_ranges: PriceRange::PRESETS.into_iter().map(PriceRangeView::from).collect(),
        products,
    })
}

/// Filtered, sorted product listing.
///
/// A failed catalog fetch is reported in `status`/`error` with an empty list,
/// not as an HTTP error.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> Result<Json<ProductListing>> {
    let fetched = state.catalog().products().await;
    Ok(Json(listing(&fetched, &params)?))
}

/// Refetch the catalog, then list it unfiltered.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Result<Json<ProductListing>> {
    let fetched = state.catalog().refresh().await;
    Ok(Json(listing(&fetched, &ProductQuery::default())?))
}

/// Product detail with specifications.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    state
        .catalog()
        .select(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Fetch state of the most recently requested product detail.
#[derive(Debug, Serialize)]
pub struct SelectedProduct {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub product: Option<Product>,
}

/// The product last opened through [`show`], with its fetch status.
#[instrument(skip(state))]
pub async fn selected(State(state): State<AppState>) -> Json<SelectedProduct> {
    let fetched = state.catalog().selected();
    Json(SelectedProduct {
        status: fetched.status(),
        error: fetched.error().map(str::to_string),
        product: fetched.value().cloned().flatten(),
    })
}

/// Reviews for a product, newest first.
#[instrument(skip(state))]
pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<Review>>> {
    Ok(Json(ReviewBook::new(state.store()).list(id)?))
}

/// Submit a review. Reviews do not require a signed-in identity.
#[instrument(skip(state, draft))]
pub async fn add_review(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(draft): Json<ReviewDraft>,
) -> Result<Json<Review>> {
    Ok(Json(ReviewBook::new(state.store()).add(id, draft)?))
}
