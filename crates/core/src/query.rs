//! Catalog query engine.
//!
//! A pure function of (products, filter, sort) to an ordered view. Inputs are
//! never mutated and nothing is cached between calls; at a few hundred
//! products a linear pass per query is cheap enough.

use core::cmp::Ordering;
use core::fmt;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::Price;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

// =============================================================================
// Price Ranges
// =============================================================================

/// Inclusive price range. A missing `max` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Price>,
}

impl PriceRange {
    /// Ranges offered as one-click filters.
    pub const PRESETS: [Self; 6] = [
        Self::between(0, 1_000),
        Self::between(1_000, 5_000),
        Self::between(5_000, 10_000),
        Self::between(10_000, 20_000),
        Self::between(20_000, 50_000),
        Self::at_least(50_000),
    ];

    #[must_use]
    pub const fn between(min: u64, max: u64) -> Self {
        Self {
            min: Price::new(min),
            max: Some(Price::new(max)),
        }
    }

    #[must_use]
    pub const fn at_least(min: u64) -> Self {
        Self {
            min: Price::new(min),
            max: None,
        }
    }

    /// Whether `price` lies inside the range, bounds included.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }

    /// Display label, e.g. `Under ₹1,000` or `₹1,000 - ₹5,000`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.max {
            None => format!("Above {}", self.min),
            Some(max) if self.min == Price::ZERO => format!("Under {max}"),
            Some(max) => format!("{} - {max}", self.min),
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// =============================================================================
// Sort Keys
// =============================================================================

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Input order.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    RatingDesc,
    /// Highest id first.
    Newest,
}

impl SortKey {
    pub const ALL: [Self; 7] = [
        Self::Relevance,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::NameAsc,
        Self::NameDesc,
        Self::RatingDesc,
        Self::Newest,
    ];

    /// Query-string identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
            Self::RatingDesc => "rating_desc",
            Self::Newest => "newest",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Relevance => "Relevance",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::NameAsc => "Name: A-Z",
            Self::NameDesc => "Name: Z-A",
            Self::RatingDesc => "Rating: High to Low",
            Self::Newest => "Newest First",
        }
    }

    /// Ordering of two products under this key. `Relevance` treats every pair
    /// as equal, which a stable sort turns into input order.
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Relevance => Ordering::Equal,
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::NameAsc => compare_names(&a.name, &b.name),
            Self::NameDesc => compare_names(&b.name, &a.name),
            Self::RatingDesc => b.rating.total_cmp(&a.rating),
            Self::Newest => b.id.cmp(&a.id),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sort key: {s}"))
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

// =============================================================================
// Filters
// =============================================================================

/// Filter criteria. Every field is optional and present fields are AND'ed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Case-insensitive category match; `"all"` or blank disables it.
    #[serde(default)]
    pub category: Option<String>,
    /// Exact brand membership; empty disables it.
    #[serde(default)]
    pub brands: BTreeSet<String>,
    #[serde(default)]
    pub price: Option<PriceRange>,
    /// Case-insensitive substring over name, description and brand.
    #[serde(default)]
    pub text: Option<String>,
}

impl CatalogFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.insert(brand.into());
        self
    }

    #[must_use]
    pub const fn with_price(mut self, range: PriceRange) -> Self {
        self.price = Some(range);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Whether `product` satisfies every active criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_category(product)
            && self.matches_brand(product)
            && self.price.is_none_or(|range| range.contains(product.price))
            && self.matches_text(product)
    }

    fn matches_category(&self, product: &Product) -> bool {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(category) if category.eq_ignore_ascii_case(ALL_CATEGORIES) => true,
            Some(category) => product.category.as_str().eq_ignore_ascii_case(category),
        }
    }

    fn matches_brand(&self, product: &Product) -> bool {
        self.brands.is_empty() || self.brands.contains(&product.brand)
    }

    fn matches_text(&self, product: &Product) -> bool {
        let Some(query) = self.text.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
            return true;
        };
        let query = query.to_lowercase();
        [&product.name, &product.description, &product.brand]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

// =============================================================================
// Query
// =============================================================================

/// Filter and sort `products`, returning references in result order.
///
/// The sort is stable for every key: products with equal keys keep their
/// relative input order.
#[must_use]
pub fn run<'a>(products: &'a [Product], filter: &CatalogFilter, sort: SortKey) -> Vec<&'a Product> {
    let mut view: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();
    if sort != SortKey::Relevance {
        view.sort_by(|a, b| sort.compare(a, b));
    }
    view
}

/// Distinct brands across `products`, sorted.
#[must_use]
pub fn brand_facet(products: &[Product]) -> BTreeSet<&str> {
    products
        .iter()
        .map(|p| p.brand.as_str())
        .filter(|brand| !brand.is_empty())
        .collect()
}
