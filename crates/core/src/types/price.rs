//! Type-safe price representation using decimal arithmetic.
//!
//! The remote catalog quotes every price in US dollars, so a [`Price`] is a
//! plain non-negative amount. Display always uses exactly two decimal places.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount in the catalog's currency (US dollars).
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use shopfront_core::Price;
///
/// let price = Price::new(Decimal::new(10995, 2)).unwrap();
/// assert_eq!(price.to_string(), "$109.95");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Amount rounded half-up to cents, e.g. `"109.95"`.
    #[must_use]
    pub fn to_fixed(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.2}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.to_fixed())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(cents: i64) -> Price {
        Price::new(Decimal::new(cents, 2)).unwrap()
    }

    #[test]
    fn test_display_has_two_decimals() {
        assert_eq!(price(10995).to_string(), "$109.95");
        assert_eq!(Price::new(Decimal::from(22)).unwrap().to_string(), "$22.00");
        assert_eq!(Price::new(Decimal::new(155, 1)).unwrap().to_string(), "$15.50");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_display_rounds_extra_precision() {
        let p = Price::new(Decimal::new(7999, 3)).unwrap();
        assert_eq!(p.to_fixed(), "8.00");
        let p = Price::new(Decimal::new(12345, 3)).unwrap();
        assert_eq!(p.to_fixed(), "12.35");
    }

    #[test]
    fn test_negative_rejected() {
        let err = Price::new(Decimal::new(-5, 0)).unwrap_err();
        assert_eq!(err, PriceError::Negative(Decimal::new(-5, 0)));
    }

    #[test]
    fn test_times_and_sum() {
        assert_eq!(price(1099).times(3), price(3297));
        let total: Price = [price(100), price(250)].into_iter().sum();
        assert_eq!(total, price(350));
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let p: Price = serde_json::from_str("109.95").unwrap();
        assert_eq!(p, price(10995));
        assert!(serde_json::from_str::<Price>("-1").is_err());
    }
}
