//! Monetary price type backed by decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("price must be positive (got {0})")]
    NotPositive(Decimal),
}

/// A positive product price.
///
/// Prices are stored as decimals rather than floats so that catalog amounts
/// like `149.99` compare and round exactly. Construction rejects zero and
/// negative amounts; ordering comparisons are used for the
/// original-price-vs-price invariant.
///
/// ## Examples
///
/// ```
/// use debandi_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(14999, 2)).unwrap();
/// let original = Price::new(Decimal::new(19999, 2)).unwrap();
/// assert!(original >= price);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] for zero or negative amounts.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an integer number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] for zero or negative amounts.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_price() {
        let price = Price::from_cents(14999).unwrap();
        assert_eq!(price.to_string(), "149.99");
    }

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(
            Price::new(Decimal::ZERO),
            Err(PriceError::NotPositive(_))
        ));
    }

    #[test]
    fn test_negative_rejected() {
        assert!(Price::from_cents(-1).is_err());
    }

    #[test]
    fn test_ordering() {
        let price = Price::from_cents(14999).unwrap();
        let original = Price::from_cents(19999).unwrap();
        assert!(original > price);
        assert!(original >= original);
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_number: Price = serde_json::from_str("149.99").unwrap();
        let from_string: Price = serde_json::from_str("\"149.99\"").unwrap();
        assert_eq!(from_number, from_string);
    }
}
