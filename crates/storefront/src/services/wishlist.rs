//! Wishlist service, scoped per identity under `wishlist:{email}`.
//!
//! Guests see an empty wishlist and toggles are not persisted for them.

use tracing::instrument;

use shopfront_core::ProductId;

use crate::models::Session;
use crate::store::{Store, StoreError, keys};

/// Wishlisted product ids in the order they were added.
pub struct WishlistService<'a> {
    store: &'a Store,
}

impl<'a> WishlistService<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Wishlisted product ids.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    pub fn items(&self, session: &Session) -> Result<Vec<ProductId>, StoreError> {
        match session.email() {
            Some(email) => self.store.get_or_default(&keys::wishlist(email)),
            None => Ok(Vec::new()),
        }
    }

    /// Whether `product_id` is wishlisted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    pub fn contains(&self, session: &Session, product_id: ProductId) -> Result<bool, StoreError> {
        Ok(self.items(session)?.contains(&product_id))
    }

    /// Add `product_id` if absent, remove it if present. Returns whether it
    /// is wishlisted afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read or written.
    #[instrument(skip(self, session))]
    pub fn toggle(&self, session: &Session, product_id: ProductId) -> Result<bool, StoreError> {
        let mut items = self.items(session)?;
        let added = if let Some(pos) = items.iter().position(|id| *id == product_id) {
            items.remove(pos);
            false
        } else {
            items.push(product_id);
            true
        };
        if let Some(email) = session.email() {
            self.store.set(&keys::wishlist(email), &items)?;
        }
        Ok(added)
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

    #[test]
    fn test_toggle_adds_then_removes() {
        let store = Store::memory();
        let wishlist = WishlistService::new(&store);
        let session = session("a@example.com");
        let id = ProductId::new(3);

        assert!(wishlist.toggle(&session, id).unwrap());
        assert!(wishlist.contains(&session, id).unwrap());
        assert!(!wishlist.toggle(&session, id).unwrap());
        assert!(wishlist.items(&session).unwrap().is_empty());
    }

    #[test]
    fn test_wishlists_are_per_identity() {
        let store = Store::memory();
        let wishlist = WishlistService::new(&store);
        let a = session("a@example.com");
        let b = session("b@example.com");

        wishlist.toggle(&a, ProductId::new(1)).unwrap();
        wishlist.toggle(&a, ProductId::new(2)).unwrap();
        assert_eq!(
            wishlist.items(&a).unwrap(),
            vec![ProductId::new(1), ProductId::new(2)]
        );
        assert!(wishlist.items(&b).unwrap().is_empty());
    }

    #[test]
    fn test_guest_toggle_is_not_persisted() {
        let store = Store::memory();
        let wishlist = WishlistService::new(&store);
        let guest = Session::anonymous();

        assert!(wishlist.toggle(&guest, ProductId::new(1)).unwrap());
        assert!(wishlist.items(&guest).unwrap().is_empty());
    }
}
