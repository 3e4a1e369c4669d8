//! Shipping addresses and placed orders.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{OrderId, Price};

// =============================================================================
// Shipping Address
// =============================================================================

/// A field of [`ShippingAddress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Name,
    City,
    State,
    PostalCode,
}

impl AddressField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::City => "city",
            Self::State => "state",
            Self::PostalCode => "postal_code",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("please fill all address fields (missing: {})", join_fields(.0))]
    MissingFields(Vec<AddressField>),
}

fn join_fields(fields: &[AddressField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where an order ships to. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub city: String,
    pub state: String,
    #[serde(alias = "pincode")]
    pub postal_code: String,
}

impl ShippingAddress {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Check that no field is blank.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::MissingFields` listing every blank field.
    pub fn validate(&self) -> Result<(), AddressError> {
        let missing: Vec<AddressField> = [
            (AddressField::Name, &self.name),
            (AddressField::City, &self.city),
            (AddressField::State, &self.state),
            (AddressField::PostalCode, &self.postal_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AddressError::MissingFields(missing))
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// An immutable record of a checked-out cart.
///
/// Fields are private; the only ways to obtain an `Order` are [`Order::new`]
/// and deserialization, and both guarantee that `total` is the sum of the
/// item prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OrderRecord")]
pub struct Order {
    id: OrderId,
    items: Vec<Product>,
    total: Price,
    address: ShippingAddress,
    placed_at: DateTime<Utc>,
}

/// Unchecked persisted form of an [`Order`].
#[derive(Deserialize)]
struct OrderRecord {
    id: OrderId,
    items: Vec<Product>,
    total: Price,
    address: ShippingAddress,
    placed_at: DateTime<Utc>,
}

impl TryFrom<OrderRecord> for Order {
    type Error = String;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let sum: Price = record.items.iter().map(|item| item.price).sum();
        if sum != record.total {
            return Err(format!(
                "order {} total {} does not match item sum {sum}",
                record.id, record.total
            ));
        }
        Ok(Self {
            id: record.id,
            items: record.items,
            total: record.total,
            address: record.address,
            placed_at: record.placed_at,
        })
    }
}

impl Order {
    /// Build an order from a cart snapshot. The total is computed here.
    #[must_use]
    pub fn new(
        id: OrderId,
        items: Vec<Product>,
        address: ShippingAddress,
        placed_at: DateTime<Utc>,
    ) -> Self {
        let total = items.iter().map(|item| item.price).sum();
        Self {
            id,
            items,
            total,
            address,
            placed_at,
        }
    }

    #[must_use]
    pub const fn id(&self) -> OrderId {
        self.id
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    #[must_use]
    pub const fn address(&self) -> &ShippingAddress {
        &self.address
    }

    #[must_use]
    pub const fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }
}

/// Pick an id for an order placed at `now`.
///
/// Ids are millisecond timestamps. If an earlier order already holds that
/// millisecond (or a later one, after a clock step back), the id is bumped
/// past the highest existing id so ids stay unique within a history.
#[must_use]
pub fn next_order_id(now: DateTime<Utc>, existing: &[Order]) -> OrderId {
    let candidate = now.timestamp_millis();
    let next = existing
        .iter()
        .map(|order| order.id.get())
        .max()
        .map_or(candidate, |latest| candidate.max(latest.saturating_add(1)));
    OrderId::new(next)
}
