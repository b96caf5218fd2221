//! Basis-point percentages.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::RouterError;

/// 100% in basis points.
const MAX_BPS: u32 = 10_000;

/// A percentage in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Any `u32` is representable; [`is_valid_percent`](Self::is_valid_percent)
/// tells whether the value is a meaningful percentage.
///
/// # Examples
///
/// ```
/// use hydra_router::domain::{Amount, BasisPoints, Rounding};
///
/// let fee = BasisPoints::new(30);
/// assert_eq!(fee.apply(Amount::new(1_000), Rounding::Up), Ok(Amount::new(3)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// 0%.
    pub const ZERO: Self = Self(0);

    /// 100%.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value lies in `0..=10_000`.
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Returns `10_000 - self`, the share that remains after this percentage.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Overflow`] if the value exceeds 100%.
    pub const fn complement(&self) -> Result<Self, RouterError> {
        match MAX_BPS.checked_sub(self.0) {
            Some(v) => Ok(Self(v)),
            None => Err(RouterError::Overflow("basis points exceed 100%")),
        }
    }

    /// Computes `amount × self / 10_000` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Overflow`] if the product overflows.
    pub const fn apply(&self, amount: Amount, rounding: Rounding) -> Result<Amount, RouterError> {
        let product = match amount.get().checked_mul(self.0 as u128) {
            Some(v) => v,
            None => return Err(RouterError::Overflow("basis points apply overflow")),
        };
        match crate::math::div_round(product, MAX_BPS as u128, rounding) {
            Some(v) => Ok(Amount::new(v)),
            None => Err(RouterError::DivisionByZero),
        }
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
