//! Domain models for storefront.
//!
//! - [`session`] - The current identity of a profile

pub mod session;

pub use session::Session;
