//! Monetary amounts for stakes and pools.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Number of decimal places a payout share is truncated to.
pub const CENT_SCALE: u32 = 2;

/// Largest stake a table may charge per bet.
pub const MAX_STAKE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Non-negative decimal amount.
///
/// All arithmetic is checked and returns [`DomainError`] instead of producing
/// a negative, undefined, or overflowing amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount, rejecting negatives.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NegativeMoney`] if `amount` is below zero.
    pub fn try_new(amount: Decimal) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::NegativeMoney { amount });
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Add `rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MoneyOverflow`] past the decimal range.
    pub fn checked_add(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(DomainError::MoneyOverflow {
                lhs: self.0,
                rhs: rhs.0,
            })
    }

    /// Subtract `rhs`, failing if the result would be negative.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MoneyUnderflow`] when `rhs > self`.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, DomainError> {
        if rhs.0 > self.0 {
            return Err(DomainError::MoneyUnderflow {
                lhs: self.0,
                rhs: rhs.0,
            });
        }
        Ok(Self(self.0 - rhs.0))
    }

    /// Divide by a positive count.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DivideByZero`] when `divisor` is zero.
    pub fn checked_div(self, divisor: usize) -> Result<Self, DomainError> {
        if divisor == 0 {
            return Err(DomainError::DivideByZero);
        }
        Ok(Self(self.0 / Decimal::from(divisor)))
    }

    /// Split into `parts` equal shares truncated to whole cents.
    ///
    /// Returns `(share, remainder)` where `share * parts + remainder == self`
    /// exactly. The remainder is always smaller than `parts` cents plus any
    /// sub-cent precision `self` carried.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DivideByZero`] when `parts` is zero.
    pub fn split_evenly(self, parts: usize) -> Result<(Self, Self), DomainError> {
        let raw = self.checked_div(parts)?;
        let share = raw
            .0
            .round_dp_with_strategy(CENT_SCALE, RoundingStrategy::ToZero);
        let distributed = share * Decimal::from(parts);
        Ok((Self(share), Self(self.0 - distributed)))
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
