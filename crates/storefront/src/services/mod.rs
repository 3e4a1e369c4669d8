//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Signup, login and logout against the identity registry
//! - `cart` - Per-identity cart entries
//! - `orders` - Atomic order placement and order history
//! - `reviews` - Product reviews, newest first
//! - `wishlist` - Per-identity wishlist
//!
//! Every service borrows the [`Store`](crate::store::Store) and takes the
//! [`Session`](crate::models::Session) explicitly where it is identity-scoped.

pub mod auth;
pub mod cart;
pub mod orders;
pub mod reviews;
pub mod wishlist;
