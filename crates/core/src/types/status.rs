//! Status enums derived from catalog data or attached to identities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Stock availability label derived from the stock count.
///
/// | stock      | label               |
/// |------------|---------------------|
/// | 0          | Out of Stock        |
/// | 1..=9      | Low Stock           |
/// | 10..=49    | In Stock            |
/// | 50 and up  | High Availability   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "High Availability")]
    HighAvailability,
}

impl Availability {
    /// Stock below this is "Low Stock".
    pub const LOW_STOCK_BELOW: u32 = 10;
    /// Stock below this (and at least `LOW_STOCK_BELOW`) is "In Stock".
    pub const IN_STOCK_BELOW: u32 = 50;

    /// Derive the availability label from a stock count.
    #[must_use]
    pub const fn from_stock(stock: u32) -> Self {
        if stock == 0 {
            Self::OutOfStock
        } else if stock < Self::LOW_STOCK_BELOW {
            Self::LowStock
        } else if stock < Self::IN_STOCK_BELOW {
            Self::InStock
        } else {
            Self::HighAvailability
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of Stock",
            Self::LowStock => "Low Stock",
            Self::InStock => "In Stock",
            Self::HighAvailability => "High Availability",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Role attached to an identity.
///
/// Identities created through signup carry no role; they are shown as
/// [`Role::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Admin => write!(f, "Admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
