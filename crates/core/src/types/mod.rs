//! Core value types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use credential::PasswordHash;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CURRENCY_SYMBOL, Price};
pub use status::*;
