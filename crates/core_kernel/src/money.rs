//! Money and rate types with precise decimal arithmetic
//!
//! All billing amounts in the system are rupee values; there is no
//! multi-currency handling. `Money` wraps rust_decimal to avoid
//! floating-point drift in share and balance calculations.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use thiserror::Error;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Rate out of range: {0} (expected 0-100)")]
    RateOutOfRange(Decimal),
}

/// A monetary amount in rupees
///
/// Amounts are rounded to two decimal places on construction so that
/// aggregates computed in different orders always agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new Money value, rounded to two decimal places
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(2))
    }

    /// The zero amount
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Returns the underlying decimal amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Clamps negative amounts to zero
    ///
    /// Balance columns must never go below zero even when an invoice is
    /// overpaid; the overage is reported separately as excess.
    pub fn clamp_non_negative(self) -> Self {
        if self.is_negative() {
            Money::ZERO
        } else {
            self
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{:.2}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// A percentage rate (share percentages, TDS percentages)
///
/// Stored as the percentage figure itself (20 means 20%), matching how
/// rates appear on hospital agreements and TDS certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(Decimal);

impl Rate {
    /// The zero rate
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// Creates a rate from a percentage figure (e.g., 20 for 20%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self(percentage)
    }

    /// Creates a share rate, validating the 0-100 range
    ///
    /// Hospital service-line shares are contractual percentages of the
    /// patient's final bill and must sit inside 0-100.
    pub fn share(percentage: Decimal) -> Result<Self, MoneyError> {
        if percentage < dec!(0) || percentage > dec!(100) {
            return Err(MoneyError::RateOutOfRange(percentage));
        }
        Ok(Self(percentage))
    }

    /// Returns the percentage figure
    pub fn as_percentage(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a fraction (0.2 for 20%)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / dec!(100)
    }

    /// Returns true if the rate is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Applies this rate to a money amount
    pub fn apply(&self, money: Money) -> Money {
        Money::new(money.amount() * self.as_fraction())
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_rounds_to_paise() {
        let m = Money::new(dec!(100.505));
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(Money::default(), Money::ZERO);
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(1000));
        let b = Money::new(dec!(250.50));

        assert_eq!((a + b).amount(), dec!(1250.50));
        assert_eq!((a - b).amount(), dec!(749.50));
    }

    #[test]
    fn test_clamp_non_negative() {
        let balance = Money::new(dec!(1000)) - Money::new(dec!(1200));
        assert!(balance.is_negative());
        assert_eq!(balance.clamp_non_negative(), Money::ZERO);

        let positive = Money::new(dec!(500));
        assert_eq!(positive.clamp_non_negative(), positive);
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [dec!(100), dec!(200.25), dec!(0.75)]
            .into_iter()
            .map(Money::new)
            .sum();
        assert_eq!(total.amount(), dec!(301));
    }

    #[test]
    fn test_share_rate_bounds() {
        assert!(Rate::share(dec!(0)).is_ok());
        assert!(Rate::share(dec!(100)).is_ok());
        assert!(matches!(
            Rate::share(dec!(101)),
            Err(MoneyError::RateOutOfRange(_))
        ));
        assert!(matches!(
            Rate::share(dec!(-1)),
            Err(MoneyError::RateOutOfRange(_))
        ));
    }

    #[test]
    fn test_rate_application() {
        let rate = Rate::from_percentage(dec!(20));
        let share = rate.apply(Money::new(dec!(900)));
        assert_eq!(share.amount(), dec!(180));
    }
}
