//! Money types with precise decimal arithmetic
//!
//! The fee ledger runs in a single school currency, so `Money` carries only
//! an amount. All arithmetic goes through rust_decimal to keep totals
//! reconciling exactly.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use thiserror::Error;

/// Internal precision for stored amounts
const STORAGE_DP: u32 = 4;

/// Precision used when presenting amounts
const DISPLAY_DP: u32 = 2;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// A monetary amount in the school's currency
///
/// Amounts are normalised to 4 decimal places on construction so that sums
/// of many fee records compare exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(STORAGE_DP))
    }

    /// Creates Money from minor units (cents)
    pub fn from_minor(minor_units: i64) -> Self {
        Self::new(Decimal::new(minor_units, DISPLAY_DP))
    }

    /// Creates Money from a whole number of major units
    pub fn from_major(units: i64) -> Self {
        Self::new(Decimal::from(units))
    }

    /// Zero amount
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Rounds to the presentation precision
    pub fn round_to_display(&self) -> Self {
        Self(self.0.round_dp(DISPLAY_DP))
    }

    /// Clamps negative amounts to zero
    pub fn non_negative(&self) -> Self {
        if self.is_negative() {
            Self::zero()
        } else {
            *self
        }
    }

    /// Multiplies by a whole count (e.g. number of students)
    pub fn times(&self, count: usize) -> Self {
        Self::new(self.0 * Decimal::from(count))
    }

    /// Expresses `self` as a whole percentage of `total`
    ///
    /// Rounds half away from zero. Returns `DivisionByZero` when `total`
    /// is zero so callers decide what an empty base means.
    pub fn percentage_of(&self, total: Money) -> Result<i64, MoneyError> {
        if total.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        let ratio = self
            .0
            .checked_div(total.0)
            .and_then(|r| r.checked_mul(dec!(100)))
            .ok_or_else(|| MoneyError::InvalidAmount(format!("{} is out of range as a share of {}", self, total)))?;
        ratio
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| MoneyError::InvalidAmount(format!("percentage {} out of range", ratio)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.dp$}", self.0.round_dp(DISPLAY_DP), dp = DISPLAY_DP as usize)
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
