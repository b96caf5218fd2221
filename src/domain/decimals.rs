//! Token decimal precision.

use serde::{Deserialize, Serialize};

use super::Rounding;
use crate::error::RouterError;

/// Largest supported precision.
const MAX_DECIMALS: u8 = 18;

/// Number of decimal places a token's raw magnitude carries.
///
/// Fixed per token. An 18-decimal DAI amount and an 8-decimal WBTC amount
/// are not comparable until one of them is rescaled with
/// [`Decimals::rescale`].
///
/// # Examples
///
/// ```
/// use hydra_router::domain::{Decimals, Rounding};
///
/// let dai = Decimals::new(18).expect("valid");
/// let wbtc = Decimals::new(8).expect("valid");
/// // 1.5 units at 18 decimals, expressed at 8 decimals
/// let raw = dai.scale_up(3) / 2;
/// assert_eq!(dai.rescale(raw, wbtc, Rounding::Down), Some(150_000_000));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Decimals(u8);

impl Decimals {
    /// Zero decimal places.
    pub const ZERO: Self = Self(0);

    /// Maximum supported precision (18).
    pub const MAX: Self = Self(MAX_DECIMALS);

    /// Creates a new `Decimals` after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidToken`] if `value` exceeds 18.
    pub const fn new(value: u8) -> Result<Self, RouterError> {
        if value > MAX_DECIMALS {
            return Err(RouterError::InvalidToken("decimals must be 0..=18"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Converts whole units to raw units. `u64::MAX * 10^18` fits in `u128`.
    #[must_use]
    pub const fn scale_up(&self, whole: u64) -> u128 {
        (whole as u128) * self.factor()
    }

    /// Returns `10^decimals`.
    #[must_use]
    pub const fn factor(&self) -> u128 {
        10u128.pow(self.0 as u32)
    }

    /// Re-expresses `raw` (at this precision) at precision `target`.
    ///
    /// Widening multiplies and returns `None` on overflow; narrowing divides
    /// with the requested rounding.
    #[must_use]
    pub const fn rescale(&self, raw: u128, target: Self, rounding: Rounding) -> Option<u128> {
        if target.0 >= self.0 {
            let factor = 10u128.pow((target.0 - self.0) as u32);
            raw.checked_mul(factor)
        } else {
            let factor = 10u128.pow((self.0 - target.0) as u32);
            crate::math::div_round(raw, factor, rounding)
        }
    }
}

impl TryFrom<u8> for Decimals {
    type Error = RouterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Decimals> for u8 {
    fn from(value: Decimals) -> Self {
        value.0
    }
}
