//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! # Phones under ₹20,000, cheapest first
//! shopfront products --category mobiles --max-price 20000 --sort price_asc
//!
//! # One product with specifications
//! shopfront product 12
//! ```

use std::io::Write;

use shopfront_core::query::{self, ALL_CATEGORIES};
use shopfront_core::{CatalogFilter, PriceRange, ProductId, SortKey, brand_facet};

use super::{CommandError, Context, product_line};

/// Listing options.
#[derive(Debug, Default, Clone)]
pub struct ListOptions {
    pub category: Option<String>,
    pub search: Option<String>,
    pub brands: Vec<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub sort: SortKey,
}

impl ListOptions {
    fn filter(&self) -> CatalogFilter {
        let mut filter = CatalogFilter::new();
        if let Some(category) = self
            .category
            .as_deref()
            .filter(|c| !c.eq_ignore_ascii_case(ALL_CATEGORIES))
        {
            filter = filter.with_category(category);
        }
        for brand in &self.brands {
            filter = filter.with_brand(brand.as_str());
        }
        if let Some(text) = &self.search {
            filter = filter.with_text(text.as_str());
        }
        match (self.min_price, self.max_price) {
            (None, None) => {}
            (min, Some(max)) => filter = filter.with_price(PriceRange::between(min.unwrap_or(0), max)),
            (Some(min), None) => filter = filter.with_price(PriceRange::at_least(min)),
        }
        filter
    }
}

/// List products matching `options`.
///
/// # Errors
///
/// Returns `CommandError::Catalog` if the catalog cannot be fetched.
pub async fn list(ctx: &Context, options: &ListOptions, out: &mut dyn Write) -> Result<(), CommandError> {
    let products = ctx.catalog.try_fetch_products().await?;
    let view = query::run(&products, &options.filter(), options.sort);

    for product in &view {
        writeln!(out, "{}", product_line(product))?;
    }
    writeln!(
        out,
        "{} of {} products, sorted by {}",
        view.len(),
        products.len(),
        options.sort.label()
    )?;

    let brands: Vec<&str> = brand_facet(&products).into_iter().collect();
    if !brands.is_empty() {
        writeln!(out, "Brands: {}", brands.join(", "))?;
    }
    Ok(())
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns `CommandError::ProductNotFound` if the catalog has no such product.
/// Returns `CommandError::Catalog` if the catalog cannot be fetched.
pub async fn show(ctx: &Context, id: ProductId, out: &mut dyn Write) -> Result<(), CommandError> {
    let product = ctx.product(id).await?;

    writeln!(out, "{}", product_line(&product))?;
    if !product.description.is_empty() {
        writeln!(out, "{}", product.description)?;
    }
    if let Some(savings) = product.savings() {
        writeln!(out, "You save {savings}")?;
    }
    if !product.badges.is_empty() {
        let badges: Vec<&str> = product.badges.iter().map(|b| b.label()).collect();
        writeln!(out, "Badges: {}", badges.join(", "))?;
    }
    for feature in &product.features {
        writeln!(out, "  - {feature}")?;
    }
    if let Some(emi) = &product.emi {
        writeln!(out, "{emi}")?;
    }
    if !product.warranty.is_empty() {
        writeln!(out, "Warranty: {}", product.warranty)?;
    }
    if let Some(specs) = &product.specifications {
        if let Some(sku) = &specs.sku {
            writeln!(out, "SKU: {sku}")?;
        }
        if let Some(weight) = specs.weight {
            writeln!(out, "Weight: {weight}")?;
        }
        if let Some(d) = &specs.dimensions {
            writeln!(out, "Dimensions: {} x {} x {}", d.width, d.height, d.depth)?;
        }
    }
    Ok(())
}
