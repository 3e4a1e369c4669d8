//! Order service.
//!
//! Placing an order is the one operation that touches two keys: it appends to
//! `orders:{email}` and then deletes `cart:{email}`. If deleting the cart
//! fails, the previous order history is written back so callers never see an
//! order whose cart still exists.

use chrono::{DateTime, Utc};
use tracing::instrument;

use shopfront_core::{AddressError, Cart, Order, ShippingAddress, next_order_id};

use crate::models::Session;
use crate::store::{Store, StoreError, keys};

/// Errors from order operations.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Checkout requires a signed-in identity.
    #[error("sign in to place an order")]
    NotAuthenticated,

    /// An address field is blank.
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The stored order history does not decode; it is left untouched.
    #[error("order history is unreadable: {0}")]
    CorruptHistory(#[source] serde_json::Error),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Checkout and order history for the session's identity.
pub struct OrderService<'a> {
    store: &'a Store,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Turn the current cart into an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotAuthenticated` without an identity.
    /// Returns `OrderError::InvalidAddress` if any address field is blank.
    /// Returns `OrderError::EmptyCart` if the cart has no entries.
    /// Returns `OrderError::Store` if persisting fails; cart and history are
    /// then left as they were.
    pub fn place_order(
        &self,
        session: &Session,
        address: ShippingAddress,
    ) -> Result<Order, OrderError> {
        self.place_order_at(session, address, Utc::now())
    }

    #[instrument(skip(self, session, address))]
    pub(crate) fn place_order_at(
        &self,
        session: &Session,
        address: ShippingAddress,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        let email = session.email().ok_or(OrderError::NotAuthenticated)?;
        address.validate()?;

        let cart_key = keys::cart(email);
        let orders_key = keys::orders(email);

        let cart: Cart = self.store.get_or_default(&cart_key)?;
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let previous = self.store.raw().get(&orders_key)?;
        let mut orders: Vec<Order> = match previous.as_deref() {
            Some(text) => serde_json::from_str(text).map_err(|e| {
                tracing::error!(error = %e, "Refusing to overwrite unreadable order history");
                OrderError::CorruptHistory(e)
            })?,
            None => Vec::new(),
        };

        let order = Order::new(
            next_order_id(now, &orders),
            cart.into_items(),
            address,
            now,
        );
        orders.push(order.clone());
        self.store.set(&orders_key, &orders)?;

        if let Err(e) = self.store.remove(&cart_key) {
            if let Err(restore_error) = self.store.restore(&orders_key, previous.as_deref()) {
                tracing::error!(
                    error = %restore_error,
                    order_id = %order.id(),
                    "Failed to roll back order history"
                );
            }
            return Err(e.into());
        }

        tracing::info!(
            order_id = %order.id(),
            total = %order.total(),
            items = order.items().len(),
            "Order placed"
        );
        Ok(order)
    }

    /// Orders of the current identity, oldest first. Empty without an
    /// identity.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Store` if the store cannot be read.
    pub fn history(&self, session: &Session) -> Result<Vec<Order>, OrderError> {
        match session.email() {
            Some(email) => Ok(self.store.get_or_default(&keys::orders(email))?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use shopfront_core::{AddressField, Email, Identity, Price, Product, ProductId};

    use super::*;
    use crate::services::cart::CartService;
    use crate::store::{KeyValueStore, MemoryStore};

    fn session() -> Session {
        Session::signed_in(Identity {
            name: "Asha".to_string(),
            email: Email::parse("asha@example.com").unwrap(),
            role: None,
        })
    }

    fn address() -> ShippingAddress {
        ShippingAddress::new("Asha", "Pune", "Maharashtra", "411001")
    }

    fn fill_cart(store: &Store, session: &Session) {
        let carts = CartService::new(store);
        carts
            .add_item(session, Product::new(ProductId::new(1), "Phone", Price::new(1000)).with_stock(5))
            .unwrap();
        carts
            .add_item(session, Product::new(ProductId::new(2), "Case", Price::new(250)).with_stock(5))
            .unwrap();
    }

    #[test]
    fn test_place_order_moves_cart_into_history() {
        let store = Store::memory();
        let session = session();
        fill_cart(&store, &session);

        let order = OrderService::new(&store)
            .place_order(&session, address())
            .unwrap();

        assert_eq!(order.total(), Price::new(1250));
        assert_eq!(order.items().len(), 2);
        assert!(CartService::new(&store).items(&session).unwrap().is_empty());
        assert!(store.raw().get("cart:asha@example.com").unwrap().is_none());

        let history = OrderService::new(&store).history(&session).unwrap();
        assert_eq!(history, vec![order]);
    }

    #[test]
    fn test_invalid_address_changes_nothing() {
        let store = Store::memory();
        let session = session();
        fill_cart(&store, &session);

        let mut address = address();
        address.state.clear();
        let err = OrderService::new(&store)
            .place_order(&session, address)
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidAddress(AddressError::MissingFields(ref fields))
                if fields == &[AddressField::State]
        ));

        assert_eq!(CartService::new(&store).count(&session).unwrap(), 2);
        assert!(OrderService::new(&store).history(&session).unwrap().is_empty());
    }

    #[test]
    fn test_empty_cart_and_guest_are_rejected() {
        let store = Store::memory();
        let orders = OrderService::new(&store);
        assert!(matches!(
            orders.place_order(&session(), address()),
            Err(OrderError::EmptyCart)
        ));
        assert!(matches!(
            orders.place_order(&Session::anonymous(), address()),
            Err(OrderError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_order_ids_are_unique_within_millisecond() {
        let store = Store::memory();
        let session = session();
        let orders = OrderService::new(&store);
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        fill_cart(&store, &session);
        let first = orders.place_order_at(&session, address(), now).unwrap();
        fill_cart(&store, &session);
        let second = orders.place_order_at(&session, address(), now).unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(orders.history(&session).unwrap().len(), 2);
    }

    /// Memory store whose `remove` always fails.
    struct FailingRemove(MemoryStore);

    impl KeyValueStore for FailingRemove {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            if key.starts_with("cart:") {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.0.remove(key)
        }
    }

    #[test]
    fn test_failed_cart_removal_rolls_back_history() {
        let store = Store::new(Arc::new(FailingRemove(MemoryStore::new())));
        let session = session();
        fill_cart(&store, &session);

        let err = OrderService::new(&store)
            .place_order(&session, address())
            .unwrap_err();
        assert!(matches!(err, OrderError::Store(_)));

        assert!(store.raw().get("orders:asha@example.com").unwrap().is_none());
        assert_eq!(CartService::new(&store).count(&session).unwrap(), 2);
    }

    #[test]
    fn test_unreadable_history_is_never_overwritten() {
        let store = Store::memory();
        let session = session();
        let orders = OrderService::new(&store);
        for _ in 0..3 {
            fill_cart(&store, &session);
            orders.place_order(&session, address()).unwrap();
        }

        let key = "orders:asha@example.com";
        let mut stored: serde_json::Value =
            serde_json::from_str(&store.raw().get(key).unwrap().unwrap()).unwrap();
        stored[0]["total"] = serde_json::json!(1);
        let tampered = stored.to_string();
        store.raw().set(key, &tampered).unwrap();

        fill_cart(&store, &session);
        let err = orders.place_order(&session, address()).unwrap_err();
        assert!(matches!(err, OrderError::CorruptHistory(_)));

        assert_eq!(store.raw().get(key).unwrap().as_deref(), Some(tampered.as_str()));
        assert_eq!(CartService::new(&store).count(&session).unwrap(), 2);
    }
}
