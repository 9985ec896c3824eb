//! Monetary amounts in the smallest currency unit.
//!
//! Prices and charges never go through floating point: `Money::from_minor(1800)`
//! is 18.00 in a two-decimal currency. Arithmetic is checked and reports
//! overflow as `None` instead of wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount in minor units (satang, cents, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Unit price times a quantity, e.g. a cart line total.
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_is_exact() {
        let price = Money::from_minor(1800);
        assert_eq!(price.checked_mul(2), Some(Money::from_minor(3600)));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(Money::from_minor(i64::MAX).checked_mul(2), None);
        assert_eq!(Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)), None);
    }

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Money::from_minor(3605).to_string(), "36.05");
        assert_eq!(Money::from_minor(-50).to_string(), "-0.50");
    }
}
