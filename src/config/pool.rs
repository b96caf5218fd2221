//! Configuration for a constant-product pool (Uniswap V2 style).

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, FeeTier, TokenPair};
use crate::error::RouterError;

/// Immutable parameters of a constant-product pool (`x · y = k`).
///
/// Reserves are given in canonical pair order.
///
/// # Derived Values
///
/// - Initial invariant: `k = reserve_first × reserve_second`
/// - Initial position-token supply: `floor(sqrt(k))`
///
/// # Examples
///
/// ```
/// use hydra_router::config::PoolConfig;
/// use hydra_router::domain::{Address, Amount, Decimals, FeeTier, Token, TokenPair};
///
/// let dai = Token::new(Address::repeat_byte(0x6b), Decimals::new(18).expect("valid"));
/// let wbtc = Token::new(Address::repeat_byte(0x22), Decimals::new(8).expect("valid"));
/// let pair = TokenPair::new(dai, wbtc).expect("distinct");
///
/// let cfg = PoolConfig::new(
///     pair,
///     FeeTier::TIER_0_30_PERCENT,
///     Amount::new(100 * 100_000_000),
///     Amount::new(2_800_000 * 10u128.pow(18)),
/// );
/// assert!(cfg.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default)]
    fee_tier: FeeTier,
    reserve_first: Amount,
    reserve_second: Amount,
    pair: TokenPair,
}

impl PoolConfig {
    /// Creates a validated pool configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if a reserve is zero or
    /// the fee is not below 100%.
    pub fn new(
        pair: TokenPair,
        fee_tier: FeeTier,
        reserve_first: Amount,
        reserve_second: Amount,
    ) -> Result<Self, RouterError> {
        let config = Self {
            pair,
            fee_tier,
            reserve_first,
            reserve_second,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if a reserve is zero or
    /// the fee is not below 100%.
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.reserve_first.is_zero() || self.reserve_second.is_zero() {
            return Err(RouterError::InvalidConfiguration(
                "pool reserves must be non-zero",
            ));
        }
        if self.fee_tier.basis_points().get() >= 10_000 {
            return Err(RouterError::InvalidConfiguration(
                "pool fee must be below 100%",
            ));
        }
        Ok(())
    }

    /// Returns the token pair.
    #[must_use]
    pub const fn pair(&self) -> &TokenPair {
        &self.pair
    }

    /// Returns the fee tier.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    /// Returns the initial reserve of `pair.first()`.
    pub const fn reserve_first(&self) -> Amount {
        self.reserve_first
    }

    /// Returns the initial reserve of `pair.second()`.
    pub const fn reserve_second(&self) -> Amount {
        self.reserve_second
    }
}
