//! Services over the file-backed profile store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use tempfile::TempDir;

use shopfront_core::{Category, Price, Product, ProductId, ReviewDraft, ShippingAddress};
use shopfront_storefront::models::Session;
use shopfront_storefront::services::auth::{AuthError, AuthService};
use shopfront_storefront::services::cart::CartService;
use shopfront_storefront::services::orders::{OrderError, OrderService};
use shopfront_storefront::services::reviews::ReviewBook;
use shopfront_storefront::services::wishlist::WishlistService;
use shopfront_storefront::store::{FileStore, KeyValueStore, Store, StoreError};

fn phone() -> Product {
    Product::new(ProductId::new(1), "Pocket Phone", Price::new(1_000))
        .with_category(Category::Mobiles)
        .with_brand("A")
        .with_rating(4.6)
        .with_stock(25)
}

fn address() -> ShippingAddress {
    ShippingAddress::new("Asha", "Pune", "MH", "411001")
}

#[test]
fn test_profile_survives_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let store = Store::open(dir.path()).unwrap();
        let mut session = Session::anonymous();
        AuthService::new(&store)
            .signup(&mut session, "Asha", "asha@example.com", "secret1")
            .unwrap();
        CartService::new(&store)
            .add_quantity(&session, phone(), 2)
            .unwrap();
        WishlistService::new(&store)
            .toggle(&session, ProductId::new(7))
            .unwrap();
        ReviewBook::new(&store)
            .add(ProductId::new(1), ReviewDraft::new("Asha", 5, "Great"))
            .unwrap();
    }

    let store = Store::open(dir.path()).unwrap();
    let session = Session::restore(&store).unwrap();
    assert_eq!(session.email().unwrap().as_str(), "asha@example.com");

    let cart = CartService::new(&store).cart(&session).unwrap();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.items()[0], phone());
    assert_eq!(cart.total(), Price::new(2_000));

    assert_eq!(
        WishlistService::new(&store).items(&session).unwrap(),
        vec![ProductId::new(7)]
    );
    assert_eq!(ReviewBook::new(&store).list(ProductId::new(1)).unwrap().len(), 1);
}

#[test]
fn test_logout_keeps_identity_data() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let auth = AuthService::new(&store);
    let cart = CartService::new(&store);
    let mut session = Session::anonymous();

    auth.signup(&mut session, "Asha", "asha@example.com", "secret1")
        .unwrap();
    cart.add_item(&session, phone()).unwrap();
    auth.logout(&mut session).unwrap();

    assert!(Session::restore(&store).unwrap().identity().is_none());
    assert!(cart.cart(&session).unwrap().is_empty());

    auth.signup(&mut session, "Ravi", "ravi@example.com", "secret2")
        .unwrap();
    assert!(cart.cart(&session).unwrap().is_empty());
    auth.logout(&mut session).unwrap();

    assert!(matches!(
        auth.login(&mut session, "asha@example.com", "secret2"),
        Err(AuthError::InvalidCredentials)
    ));
    auth.login(&mut session, "asha@example.com", "secret1")
        .unwrap();
    assert_eq!(cart.count(&session).unwrap(), 1);
}

#[test]
fn test_orders_get_increasing_ids_and_clear_cart() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let mut session = Session::anonymous();
    AuthService::new(&store)
        .signup(&mut session, "Asha", "asha@example.com", "secret1")
        .unwrap();

    let cart = CartService::new(&store);
    let orders = OrderService::new(&store);

    cart.add_item(&session, phone()).unwrap();
    let first = orders.place_order(&session, address()).unwrap();
    cart.add_item(&session, phone()).unwrap();
    let second = orders.place_order(&session, address()).unwrap();

    assert!(second.id() > first.id());
    assert!(cart.cart(&session).unwrap().is_empty());
    assert_eq!(orders.history(&session).unwrap(), vec![first, second]);

    assert!(matches!(
        orders.place_order(&session, address()),
        Err(OrderError::EmptyCart)
    ));
}

/// File store whose cart deletions fail.
struct StuckCart(FileStore);

impl KeyValueStore for StuckCart {
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
                source: std::io::Error::other("read-only"),
            });
        }
        self.0.remove(key)
    }
}

#[test]
fn test_failed_checkout_leaves_profile_unchanged() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(Arc::new(StuckCart(FileStore::open(dir.path()).unwrap())));
    let mut session = Session::anonymous();
    AuthService::new(&store)
        .signup(&mut session, "Asha", "asha@example.com", "secret1")
        .unwrap();

    let cart = CartService::new(&store);
    let orders = OrderService::new(&store);
    cart.add_item(&session, phone()).unwrap();
    let placed = orders.place_order(&session, address());
    assert!(matches!(placed, Err(OrderError::Store(_))));

    assert!(orders.history(&session).unwrap().is_empty());
    assert_eq!(cart.count(&session).unwrap(), 1);
}

#[test]
fn test_corrupt_cart_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let mut session = Session::anonymous();
    AuthService::new(&store)
        .signup(&mut session, "Asha", "asha@example.com", "secret1")
        .unwrap();

    store
        .raw()
        .set("cart:asha@example.com", "{not json")
        .unwrap();
    assert!(CartService::new(&store).cart(&session).unwrap().is_empty());
}
