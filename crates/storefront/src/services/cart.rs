//! Cart service.
//!
//! Carts live under `cart:{email}` and are only ever read or written through
//! the session's identity. Without an identity every operation acts on an
//! empty cart that is never persisted.

use tracing::instrument;

use shopfront_core::{Cart, Price, Product, ProductId};

use crate::models::Session;
use crate::store::{Store, StoreError, keys};

/// Errors from cart operations.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The product has no stock left.
    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    /// The cart would hold more units than are in stock.
    #[error("only {available} of {name} in stock")]
    ExceedsStock { name: String, available: u32 },

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Cart operations for the session's identity.
pub struct CartService<'a> {
    store: &'a Store,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// The current cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the store cannot be read.
    pub fn cart(&self, session: &Session) -> Result<Cart, CartError> {
        match session.email() {
            Some(email) => Ok(self.store.get_or_default(&keys::cart(email))?),
            None => Ok(Cart::new()),
        }
    }

    /// Line entries of the current cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the store cannot be read.
    pub fn items(&self, session: &Session) -> Result<Vec<Product>, CartError> {
        Ok(self.cart(session)?.into_items())
    }

    /// Number of line entries.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the store cannot be read.
    pub fn count(&self, session: &Session) -> Result<usize, CartError> {
        Ok(self.cart(session)?.len())
    }

    /// Sum of line entry prices.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the store cannot be read.
    pub fn total(&self, session: &Session) -> Result<Price, CartError> {
        Ok(self.cart(session)?.total())
    }

    /// Append a snapshot of `product` and persist.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the store cannot be read or written.
    #[instrument(skip(self, session, product), fields(product_id = %product.id))]
    pub fn add_item(&self, session: &Session, product: Product) -> Result<Cart, CartError> {
        self.add_quantity(session, product, 1)
    }

    /// Append `quantity` snapshots of `product` and persist once.
    ///
    /// Entries already in the cart count against the product's stock.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero quantity.
    /// Returns `CartError::OutOfStock` if the product has no stock.
    /// Returns `CartError::ExceedsStock` if the cart would exceed the stock.
    /// Returns `CartError::Store` if the store cannot be read or written.
    #[instrument(skip(self, session, product), fields(product_id = %product.id))]
    pub fn add_quantity(
        &self,
        session: &Session,
        product: Product,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !product.in_stock() {
            return Err(CartError::OutOfStock { name: product.name });
        }
        let mut cart = self.cart(session)?;
        let held = cart.items().iter().filter(|p| p.id == product.id).count();
        let held = u32::try_from(held).unwrap_or(u32::MAX);
        if held.saturating_add(quantity) > product.stock {
            return Err(CartError::ExceedsStock {
                available: product.stock.saturating_sub(held),
                name: product.name,
            });
        }
        for _ in 1..quantity {
            cart.add(product.clone());
        }
        cart.add(product);
        self.save(session, &cart)?;
        Ok(cart)
    }

    /// Remove every entry for `product_id` and persist.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the store cannot be read or written.
    #[instrument(skip(self, session))]
    pub fn remove_item(&self, session: &Session, product_id: ProductId) -> Result<Cart, CartError> {
        let mut cart = self.cart(session)?;
        let removed = cart.remove_all(product_id);
        tracing::debug!(removed, "Removed cart entries");
        self.save(session, &cart)?;
        Ok(cart)
    }

    /// Empty the cart, deleting its key.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the key cannot be removed.
    #[instrument(skip(self, session))]
    pub fn clear(&self, session: &Session) -> Result<(), CartError> {
        if let Some(email) = session.email() {
            self.store.remove(&keys::cart(email))?;
        }
        Ok(())
    }

    fn save(&self, session: &Session, cart: &Cart) -> Result<(), CartError> {
        if let Some(email) = session.email() {
            self.store.set(&keys::cart(email), cart)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{Email, Identity};

    use super::*;

    fn session(email: &str) -> Session {
        Session::signed_in(Identity {
            name: "Test".to_string(),
            email: Email::parse(email).unwrap(),
            role: None,
        })
    }

    fn phone() -> Product {
        Product::new(ProductId::new(1), "Phone", Price::new(1000)).with_stock(10)
    }

    fn case() -> Product {
        Product::new(ProductId::new(2), "Case", Price::new(250)).with_stock(10)
    }

    #[test]
    fn test_add_persists_each_entry() {
        let store = Store::memory();
        let carts = CartService::new(&store);
        let session = session("a@example.com");

        carts.add_item(&session, phone()).unwrap();
        carts.add_item(&session, phone()).unwrap();
        carts.add_item(&session, case()).unwrap();

        assert_eq!(carts.count(&session).unwrap(), 3);
        assert_eq!(carts.total(&session).unwrap(), Price::new(2250));
        let stored: Cart = store.get(&keys::cart(session.email().unwrap())).unwrap().unwrap();
        assert_eq!(stored.len(), 3);
    }

    #[test]
    fn test_remove_item_removes_all_entries() {
        let store = Store::memory();
        let carts = CartService::new(&store);
        let session = session("a@example.com");
        carts.add_quantity(&session, phone(), 2).unwrap();
        carts.add_item(&session, case()).unwrap();

        let cart = carts.remove_item(&session, ProductId::new(1)).unwrap();
        assert_eq!(cart.items(), &[case()]);
        assert_eq!(carts.items(&session).unwrap(), vec![case()]);
    }

    #[test]
    fn test_clear_deletes_key() {
        let store = Store::memory();
        let carts = CartService::new(&store);
        let session = session("a@example.com");
        carts.add_item(&session, phone()).unwrap();

        carts.clear(&session).unwrap();
        assert!(store.raw().get("cart:a@example.com").unwrap().is_none());
        assert!(carts.items(&session).unwrap().is_empty());
    }

    #[test]
    fn test_guest_cart_is_not_persisted() {
        let store = Store::memory();
        let carts = CartService::new(&store);
        let guest = Session::anonymous();

        let cart = carts.add_item(&guest, phone()).unwrap();
        assert_eq!(cart.len(), 1);
        assert!(carts.items(&guest).unwrap().is_empty());
        carts.clear(&guest).unwrap();
    }

    #[test]
    fn test_carts_are_isolated_per_identity() {
        let store = Store::memory();
        let carts = CartService::new(&store);
        let a = session("a@example.com");
        let b = session("b@example.com");

        carts.add_item(&a, phone()).unwrap();
        assert!(carts.items(&b).unwrap().is_empty());
        carts.add_item(&b, case()).unwrap();
        assert_eq!(carts.items(&a).unwrap(), vec![phone()]);
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let store = Store::memory();
        let carts = CartService::new(&store);
        let session = session("a@example.com");
        assert!(matches!(
            carts.add_quantity(&session, phone(), 0),
            Err(CartError::InvalidQuantity)
        ));
        assert!(carts.items(&session).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_stock_product_is_rejected() {
        let store = Store::memory();
        let carts = CartService::new(&store);
        let session = session("a@example.com");
        let sold_out = phone().with_stock(0);

        assert!(matches!(
            carts.add_quantity(&session, sold_out, 100_000),
            Err(CartError::OutOfStock { .. })
        ));
        assert!(carts.items(&session).unwrap().is_empty());
    }

    #[test]
    fn test_quantity_is_capped_by_stock() {
        let store = Store::memory();
        let carts = CartService::new(&store);
        let session = session("a@example.com");
        let phone = phone().with_stock(3);

        assert!(matches!(
            carts.add_quantity(&session, phone.clone(), u32::MAX),
            Err(CartError::ExceedsStock { available: 3, .. })
        ));

        carts.add_quantity(&session, phone.clone(), 2).unwrap();
        assert!(matches!(
            carts.add_quantity(&session, phone.clone(), 2),
            Err(CartError::ExceedsStock { available: 1, .. })
        ));
        carts.add_item(&session, phone).unwrap();
        assert_eq!(carts.count(&session).unwrap(), 3);
    }
}
