//! Whole-unit price in the display currency (Indian rupees).
//!
//! Catalog prices arrive in USD with cents and are converted once by the
//! catalog adapter; from then on every price in the system is an integer
//! number of rupees, so totals are exact sums.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency symbol used when formatting prices.
pub const CURRENCY_SYMBOL: &str = "₹";

/// A price in whole rupees.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(0);

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// The amount in whole rupees.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.0
    }

    /// Round a decimal amount to the nearest whole rupee (halves away from zero).
    ///
    /// Negative amounts clamp to zero.
    #[must_use]
    pub fn from_decimal_rounded(amount: Decimal) -> Self {
        let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Self(rounded.to_u64().unwrap_or(0))
    }

    /// The amount as a decimal, for further arithmetic.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Price {
    /// Formats as `₹129,999`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{CURRENCY_SYMBOL}{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::new(0).to_string(), "₹0");
        assert_eq!(Price::new(999).to_string(), "₹999");
        assert_eq!(Price::new(1000).to_string(), "₹1,000");
        assert_eq!(Price::new(129_999).to_string(), "₹129,999");
        assert_eq!(Price::new(1_234_567).to_string(), "₹1,234,567");
    }

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(Price::from_decimal_rounded(Decimal::new(7995, 1)), Price::new(800));
        assert_eq!(Price::from_decimal_rounded(Decimal::new(7994, 1)), Price::new(799));
        assert_eq!(Price::from_decimal_rounded(Decimal::new(-5, 0)), Price::ZERO);
    }

    #[test]
    fn test_sum() {
        let prices = [Price::new(1000), Price::new(250), Price::new(5)];
        assert_eq!(prices.iter().sum::<Price>(), Price::new(1255));
        assert_eq!(Vec::<Price>::new().into_iter().sum::<Price>(), Price::ZERO);
    }
}
