//! Shopfront Core - Shared types and pure catalog logic.
//!
//! This crate provides the types and algorithms used across all Shopfront
//! components:
//! - `storefront` - JSON API, persistence and services
//! - `cli` - Command-line front-end over a local profile
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! persistence, no HTTP clients. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails and statuses
//! - [`product`] - The normalized product and its categories and badges
//! - [`catalog`] - Raw catalog records and the normalizing adapter
//! - [`cart`] - Cart contents
//! - [`query`] - Filter and sort over a product collection
//! - [`order`] - Shipping addresses and immutable orders
//! - [`review`] - Product reviews
//! - [`identity`] - Registered identities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod identity;
pub mod order;
pub mod product;
pub mod query;
pub mod review;
pub mod types;

pub use cart::Cart;
pub use catalog::{RawProduct, RawProductPage, normalize, normalize_detailed};
pub use identity::{Identity, MIN_PASSWORD_LEN, StoredIdentity};
pub use order::{AddressError, AddressField, Order, ShippingAddress, next_order_id};
pub use product::{Badge, Category, Dimensions, Product, Specifications};
pub use query::{CatalogFilter, PriceRange, SortKey, brand_facet};
pub use review::{Review, ReviewDraft, ReviewError};
pub use types::*;
