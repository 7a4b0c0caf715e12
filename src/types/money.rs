//! Monetary amounts
//!
//! Amounts are used as exact lookup keys when bank transactions are matched
//! against the ledger, so they are backed by `rust_decimal::Decimal` and
//! normalized on construction. `12.5` and `12.50` produce the same key.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Exact monetary amount
///
/// The inner decimal is always stored in normalized form (no trailing zeros),
/// which keeps `Eq` and `Hash` consistent for values that only differ in scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Create an amount from a decimal value, normalizing its scale
    pub fn new(value: Decimal) -> Self {
        Amount(value.normalize())
    }

    /// Create an amount from an integer number of minor units (cents)
    ///
    /// ```
    /// use expense_tally::types::Amount;
    ///
    /// assert_eq!(Amount::from_minor(1250).to_string(), "12.50");
    /// ```
    pub fn from_minor(minor_units: i64) -> Self {
        Amount::new(Decimal::new(minor_units, 2))
    }

    /// The underlying decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    /// Parse an amount as it appears in statements and ledger exports
    ///
    /// Surrounding whitespace and thousands separators are removed before
    /// parsing, so `" 1,234.50 "` parses to `1234.5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
        Decimal::from_str(&cleaned).map(Amount::new)
    }
}

/// Amounts print with at least two decimal places and never lose digits
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.scale() < 2 {
            let mut padded = self.0;
            padded.rescale(2);
            write!(f, "{}", padded)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
