//! Normalized catalog product.
//!
//! Products are produced by the [`catalog`](crate::catalog) adapter and are
//! immutable afterwards. Carts and orders store full product snapshots, so
//! the serialized form is also the persisted line-item format.

use core::fmt;
use std::collections::BTreeSet;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::types::{Availability, Price, ProductId};

/// Storefront category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mobiles,
    Laptops,
    Fashion,
    Accessories,
    Audio,
    Tv,
    Other,
}

impl Category {
    /// Every category, in navigation order.
    pub const ALL: [Self; 7] = [
        Self::Mobiles,
        Self::Laptops,
        Self::Fashion,
        Self::Accessories,
        Self::Audio,
        Self::Tv,
        Self::Other,
    ];

    /// Lowercase identifier used in URLs and persisted data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobiles => "mobiles",
            Self::Laptops => "laptops",
            Self::Fashion => "fashion",
            Self::Accessories => "accessories",
            Self::Audio => "audio",
            Self::Tv => "tv",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Short promotional label derived from price, rating and discount.
///
/// The variant order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "Top Rated")]
    TopRated,
    #[serde(rename = "Premium")]
    Premium,
    #[serde(rename = "Budget Pick")]
    BudgetPick,
    #[serde(rename = "Hot Deal")]
    HotDeal,
    #[serde(rename = "Deal of the Day")]
    DealOfTheDay,
    #[serde(rename = "Special Offer")]
    SpecialOffer,
}

impl Badge {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TopRated => "Top Rated",
            Self::Premium => "Premium",
            Self::BudgetPick => "Budget Pick",
            Self::HotDeal => "Hot Deal",
            Self::DealOfTheDay => "Deal of the Day",
            Self::SpecialOffer => "Special Offer",
        }
    }

    /// Whether this badge belongs to the mutually exclusive discount tier.
    #[must_use]
    pub const fn is_discount(self) -> bool {
        matches!(self, Self::HotDeal | Self::DealOfTheDay | Self::SpecialOffer)
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physical dimensions as reported by the catalog source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Detail-only specifications. Missing source values stay missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Specifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

/// A normalized product.
///
/// Serializes with the derived `in_stock` and `availability` fields as well;
/// both are ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    pub category: Category,
    pub brand: String,
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    pub stock: u32,
    #[serde(default)]
    pub badges: BTreeSet<Badge>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub warranty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emi: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Specifications>,
}

impl Product {
    /// Create a bare product with the given identity and price.
    ///
    /// Every other field starts empty; use the `with_*` methods to fill in
    /// what matters. Badges are not derived here, see
    /// [`catalog::derive_badges`](crate::catalog::derive_badges).
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        let name = name.into();
        Self {
            id,
            short_description: name.clone(),
            name,
            price,
            original_price: None,
            image: String::new(),
            images: Vec::new(),
            description: String::new(),
            category: Category::Other,
            brand: String::new(),
            rating: 0.0,
            review_count: 0,
            stock: 0,
            badges: BTreeSet::new(),
            features: Vec::new(),
            warranty: String::new(),
            emi: None,
            tags: Vec::new(),
            specifications: None,
        }
    }

    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    #[must_use]
    pub const fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    #[must_use]
    pub const fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether at least one unit is in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Availability label derived from the stock count.
    #[must_use]
    pub const fn availability(&self) -> Availability {
        Availability::from_stock(self.stock)
    }

    /// Amount saved against the original price, if any.
    #[must_use]
    pub fn savings(&self) -> Option<Price> {
        self.original_price
            .and_then(|original| original.amount().checked_sub(self.price.amount()))
            .filter(|saved| *saved > 0)
            .map(Price::new)
    }

    /// Whether the product carries the given badge.
    #[must_use]
    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Product", 23)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("price", &self.price)?;
        match &self.original_price {
            Some(original) => state.serialize_field("original_price", original)?,
            None => state.skip_field("original_price")?,
        }
        state.serialize_field("image", &self.image)?;
        state.serialize_field("images", &self.images)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("short_description", &self.short_description)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("brand", &self.brand)?;
        state.serialize_field("rating", &self.rating)?;
        state.serialize_field("review_count", &self.review_count)?;
        state.serialize_field("stock", &self.stock)?;
        state.serialize_field("in_stock", &self.in_stock())?;
        state.serialize_field("availability", &self.availability())?;
        state.serialize_field("badges", &self.badges)?;
        state.serialize_field("features", &self.features)?;
        state.serialize_field("warranty", &self.warranty)?;
        match &self.emi {
            Some(emi) => state.serialize_field("emi", emi)?,
            None => state.skip_field("emi")?,
        }
        state.serialize_field("tags", &self.tags)?;
        match &self.specifications {
            Some(specs) => state.serialize_field("specifications", specs)?,
            None => state.skip_field("specifications")?,
        }
        state.end()
    }
}
