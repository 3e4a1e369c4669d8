//! Shopping cart contents.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId};

/// An ordered list of product snapshots.
///
/// Adding the same product twice yields two independent entries; quantity
/// is the number of entries for a product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a snapshot of `product`.
    pub fn add(&mut self, product: Product) {
        self.items.push(product);
    }

    /// Remove every entry for `id`, returning how many were removed.
    pub fn remove_all(&mut self, id: ProductId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        before - self.items.len()
    }

    /// Sum of the entries' prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(|item| item.price).sum()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of entries for `id`.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> usize {
        self.items.iter().filter(|item| item.id == id).count()
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Product> {
        self.items
    }
}

impl From<Vec<Product>> for Cart {
    fn from(items: Vec<Product>) -> Self {
        Self { items }
    }
}
