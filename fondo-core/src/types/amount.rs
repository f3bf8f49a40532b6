//! Amount type for representing balances and commitments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use super::ValidationError;

/// Amount type - non-negative integer currency units.
///
/// Balances and fund minimums are abstract units with no currency attached.
/// Arithmetic is checked: subtraction that would go below zero yields `None`
/// instead of wrapping, which makes an overdraft unrepresentable.
///
/// # Examples
///
/// ```
/// use fondo_core::types::Amount;
///
/// let balance = Amount::new(500_000);
/// let minimum = Amount::new(75_000);
/// assert_eq!(balance.checked_sub(minimum), Some(Amount::new(425_000)));
/// assert_eq!(minimum.checked_sub(balance), None);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Zero amount constant.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Amount`.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Creates a strictly positive `Amount`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ZeroAmount` if the value is zero.
    pub fn positive(value: u64) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::ZeroAmount);
        }
        Ok(Self(value))
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction. Returns `None` if the result would be negative.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidAmount(s.to_string()))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|a| a.0).sum())
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        Self(iter.map(|a| a.0).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_positive() {
        assert!(Amount::positive(1).is_ok());
        assert!(matches!(
            Amount::positive(0),
            Err(ValidationError::ZeroAmount)
        ));
    }

    #[test]
    fn test_amount_checked_sub_exact() {
        let balance = Amount::new(250_000);
        assert_eq!(balance.checked_sub(Amount::new(250_000)), Some(Amount::ZERO));
    }

    #[test]
    fn test_amount_checked_add_overflow() {
        assert_eq!(Amount::new(u64::MAX).checked_add(Amount::new(1)), None);
    }

    #[test]
    fn test_amount_sum() {
        let amounts = [Amount::new(75_000), Amount::new(125_000), Amount::new(50_000)];
        let total: Amount = amounts.iter().sum();
        assert_eq!(total, Amount::new(250_000));
    }

    #[test]
    fn test_amount_from_str() {
        assert_eq!("100000".parse::<Amount>().unwrap(), Amount::new(100_000));
        assert!("-5".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
    }

    #[test]
    fn test_amount_serializes_as_integer() {
        let json = serde_json::to_string(&Amount::new(75_000)).unwrap();
        assert_eq!(json, "75000");
    }
}
