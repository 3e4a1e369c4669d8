//! Catalog data adapter.
//!
//! Converts raw records from the external catalog source (DummyJSON shape,
//! USD prices) into [`Product`]s. Conversion is infallible: every record the
//! source returns becomes a product, with defaults for missing fields.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::product::{Badge, Category, Dimensions, Product, Specifications};
use crate::types::{Price, ProductId};

/// Fixed USD → INR conversion multiplier.
pub const USD_TO_INR: u32 = 80;

/// Warranty text used when the source has none.
pub const DEFAULT_WARRANTY: &str = "1 Year Manufacturer Warranty";

/// Brands recognized in product titles when the source omits the brand.
const KNOWN_BRANDS: [&str; 6] = ["Samsung", "Apple", "Sony", "LG", "HP", "Dell"];

/// Brand used when neither the source nor the title names one.
pub const GENERIC_BRAND: &str = "Generic";

/// Prices below this get no EMI hint.
const EMI_MIN_PRICE: u64 = 3000;

/// Number of months an EMI hint is spread over.
const EMI_MONTHS: u64 = 12;

/// At most this many description sentences become features.
const MAX_FEATURES: usize = 4;

/// A page of products as returned by `GET /products?limit=N`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProductPage {
    pub products: Vec<RawProduct>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub limit: u32,
}

/// A product record as returned by the catalog source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount_percentage: Option<Decimal>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub warranty_information: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub reviews: Option<Vec<serde_json::Value>>,
}

/// Normalize a record from a list fetch.
#[must_use]
pub fn normalize(raw: RawProduct) -> Product {
    normalize_inner(raw, false)
}

/// Normalize a record from a single-item fetch, keeping its specifications.
#[must_use]
pub fn normalize_detailed(raw: RawProduct) -> Product {
    normalize_inner(raw, true)
}

fn normalize_inner(raw: RawProduct, detailed: bool) -> Product {
    let converted = raw.price * Decimal::from(USD_TO_INR);
    let price = Price::from_decimal_rounded(converted);
    let discount = raw.discount_percentage.filter(|d| !d.is_zero());
    let original_price = discount.and_then(|d| original_price(converted, d));
    let rating = raw.rating.clamp(0.0, 5.0);

    let brand = raw
        .brand
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| brand_from_title(&raw.title).to_string());

    let images = match raw.images {
        Some(images) if !images.is_empty() => images,
        _ => vec![raw.thumbnail.clone()],
    };

    let specifications = detailed.then(|| Specifications {
        weight: raw.weight,
        dimensions: raw.dimensions,
        sku: raw.sku,
        color: raw.color,
        material: raw.material,
    });

    Product {
        id: ProductId::new(raw.id),
        short_description: raw.title.clone(),
        name: raw.title,
        price,
        original_price,
        image: raw.thumbnail,
        images,
        features: extract_features(&raw.description),
        description: raw.description,
        category: map_category(&raw.category),
        brand,
        rating,
        review_count: raw
            .reviews
            .map_or(0, |r| u32::try_from(r.len()).unwrap_or(u32::MAX)),
        stock: raw.stock,
        badges: derive_badges(price, rating, discount),
        warranty: raw
            .warranty_information
            .filter(|w| !w.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WARRANTY.to_string()),
        emi: emi_hint(price),
        tags: raw.tags,
        specifications,
    }
}

/// Reconstruct the pre-discount price: `round(price / (1 - discount/100))`.
///
/// Returns `None` for discounts outside `(0, 100)`.
fn original_price(converted: Decimal, discount_percentage: Decimal) -> Option<Price> {
    let hundred = Decimal::ONE_HUNDRED;
    if discount_percentage <= Decimal::ZERO || discount_percentage >= hundred {
        return None;
    }
    let remaining = Decimal::ONE - discount_percentage / hundred;
    converted
        .checked_div(remaining)
        .map(Price::from_decimal_rounded)
}

/// Map a source category onto a storefront category.
#[must_use]
pub fn map_category(source: &str) -> Category {
    match source {
        "electronics" | "smartphones" => Category::Mobiles,
        "laptops" => Category::Laptops,
        "tops" | "womens-dresses" | "womens-shoes" | "mens-shirts" | "mens-shoes" => {
            Category::Fashion
        }
        "fragrances" | "skincare" | "mens-watches" | "womens-watches" | "womens-bags"
        | "womens-jewellery" | "sunglasses" => Category::Accessories,
        _ => Category::Other,
    }
}

/// Derive badges from the display price, rating and discount.
///
/// Discount badges are mutually exclusive; the highest threshold wins.
#[must_use]
pub fn derive_badges(price: Price, rating: f64, discount_percentage: Option<Decimal>) -> BTreeSet<Badge> {
    let mut badges = BTreeSet::new();
    if rating >= 4.5 {
        badges.insert(Badge::TopRated);
    }
    if price.amount() >= 10_000 {
        badges.insert(Badge::Premium);
    }
    if price.amount() < 2_000 {
        badges.insert(Badge::BudgetPick);
    }
    if let Some(discount) = discount_percentage.and_then(discount_badge) {
        badges.insert(discount);
    }
    badges
}

fn discount_badge(discount_percentage: Decimal) -> Option<Badge> {
    if discount_percentage >= Decimal::from(20) {
        Some(Badge::HotDeal)
    } else if discount_percentage >= Decimal::TEN {
        Some(Badge::DealOfTheDay)
    } else if discount_percentage >= Decimal::from(5) {
        Some(Badge::SpecialOffer)
    } else {
        None
    }
}

/// First known brand mentioned in the title, or [`GENERIC_BRAND`].
#[must_use]
pub fn brand_from_title(title: &str) -> &'static str {
    KNOWN_BRANDS
        .into_iter()
        .find(|brand| title.contains(brand))
        .unwrap_or(GENERIC_BRAND)
}

/// Split a description into up to four key points.
#[must_use]
pub fn extract_features(description: &str) -> Vec<String> {
    description
        .split(". ")
        .take(MAX_FEATURES)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Monthly no-cost EMI hint for prices of at least ₹3000.
#[must_use]
pub fn emi_hint(price: Price) -> Option<String> {
    if price.amount() < EMI_MIN_PRICE {
        return None;
    }
    let monthly = Price::from_decimal_rounded(price.to_decimal() / Decimal::from(EMI_MONTHS));
    Some(format!("No Cost EMI starts from {monthly}/month"))
}
