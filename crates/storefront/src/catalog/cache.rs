//! Cache types for catalog responses.

use std::sync::Arc;

use shopfront_core::{Product, ProductId};

/// Cache key for catalog responses.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products { limit: u32 },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
}
