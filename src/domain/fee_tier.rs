//! Venue fee tiers built on [`BasisPoints`].

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, BasisPoints, Rounding};
use crate::error::RouterError;

/// A pool's swap fee, with the common presets.
///
/// # Examples
///
/// ```
/// use hydra_router::domain::FeeTier;
///
/// assert_eq!(FeeTier::TIER_0_30_PERCENT.basis_points().get(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// 0.05% (5 bp).
    pub const TIER_0_05_PERCENT: Self = Self(BasisPoints::new(5));

    /// 0.30% (30 bp), the classic constant-product fee.
    pub const TIER_0_30_PERCENT: Self = Self(BasisPoints::new(30));

    /// 1.00% (100 bp).
    pub const TIER_1_00_PERCENT: Self = Self(BasisPoints::new(100));

    /// Creates a new `FeeTier`.
    #[must_use]
    pub const fn new(basis_points: BasisPoints) -> Self {
        Self(basis_points)
    }

    /// Returns the underlying basis points.
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// Fee charged on `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Overflow`] if the product overflows.
    pub const fn apply_to_amount(
        &self,
        amount: Amount,
        rounding: Rounding,
    ) -> Result<Amount, RouterError> {
        self.0.apply(amount, rounding)
    }
}

impl Default for FeeTier {
    fn default() -> Self {
        Self::TIER_0_30_PERCENT
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({})", self.0)
    }
}
