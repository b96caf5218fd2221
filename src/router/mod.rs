//! The router: quotes, swaps, liquidity and flash swaps against one venue.
//!
//! [`Router`] is a thin facade over an [`ExecutionEnvironment`]. Each
//! component lives in its own submodule as an `impl` block on the same
//! type:
//!
//! | Module | Operations |
//! |--------|------------|
//! | `quote` | [`Router::get_max_output`], [`Router::suggest_floor`] |
//! | `swap` | [`Router::swap_tokens`] |
//! | `liquidity` | [`Router::add_liquidity`], [`Router::remove_liquidity`], [`Router::remove_all_liquidity`] |
//! | `flash_swap` | [`Router::flash_swap`] |
//!
//! Every mutating operation runs inside
//! [`ExecutionEnvironment::execute_atomic`], so a failure at any step
//! leaves the ledger and the venue exactly as they were. The only state
//! the router keeps across calls is its [`FlashSwapState`].

mod approval;
mod flash_swap;
mod liquidity;
mod quote;
mod swap;

#[cfg(all(test, feature = "sandbox"))]
#[allow(clippy::panic)]
mod proptest_properties;

#[cfg(all(test, feature = "sandbox"))]
#[allow(clippy::panic)]
mod venue_faults;

use crate::config::RouterConfig;
use crate::domain::{Address, FlashSwapState, TokenAmount};
use crate::error::{Result, RouterError};
use crate::traits::{ExecutionEnvironment, TokenLedger};

/// DeFi interaction layer between a caller's custody account and a venue.
///
/// # Examples
///
/// ```
/// use hydra_router::config::{PoolConfig, RouterConfig};
/// use hydra_router::domain::{Address, Amount, Decimals, FeeTier, Token, TokenPair};
/// use hydra_router::router::Router;
/// use hydra_router::sandbox::Sandbox;
///
/// let dai = Token::new(Address::repeat_byte(0x6b), Decimals::new(18).expect("valid"));
/// let wbtc = Token::new(Address::repeat_byte(0x22), Decimals::new(8).expect("valid"));
/// let pair = TokenPair::new(dai, wbtc).expect("distinct");
///
/// let mut sandbox = Sandbox::with_venue(Address::repeat_byte(0xee));
/// sandbox.register_token(dai).expect("dai");
/// sandbox.register_token(wbtc).expect("wbtc");
/// let (first, second) = pair
///     .sort_amounts(&dai, dai.units(2_800_000).amount(), wbtc.units(100).amount())
///     .expect("sorted");
/// let pool = PoolConfig::new(pair, FeeTier::TIER_0_30_PERCENT, first, second).expect("pool");
/// sandbox.open_pool(&pool, Address::repeat_byte(0x1f)).expect("opened");
///
/// let router = Router::new(sandbox, RouterConfig::new(Address::repeat_byte(0xc5)))
///     .expect("valid config");
/// let quote = router.get_max_output(dai.units(25_000), wbtc).expect("quote");
/// assert!(quote.amount() > Amount::ZERO);
/// ```
#[derive(Debug)]
pub struct Router<E> {
    env: E,
    config: RouterConfig,
    flash_state: FlashSwapState,
}

impl<E: ExecutionEnvironment> Router<E> {
    /// Creates a router over `env`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if `config` fails
    /// validation.
    pub fn new(env: E, config: RouterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            env,
            config,
            flash_state: FlashSwapState::Idle,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Returns the custody account.
    #[must_use]
    pub const fn custody(&self) -> Address {
        self.config.custody
    }

    /// Returns the execution environment.
    #[must_use]
    pub const fn env(&self) -> &E {
        &self.env
    }

    /// Mutable access to the environment, for seeding and inspection.
    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Returns the flash-swap state after the last operation.
    #[must_use]
    pub const fn flash_state(&self) -> FlashSwapState {
        self.flash_state
    }

    /// Consumes the router and returns the environment.
    #[must_use]
    pub fn into_env(self) -> E {
        self.env
    }
}

/// Fails unless `owner` holds at least `needed`.
fn ensure_balance(ledger: &dyn TokenLedger, owner: Address, needed: TokenAmount) -> Result<()> {
    let available = ledger.balance_of(&needed.token(), owner);
    if available < needed.amount() {
        return Err(RouterError::InsufficientCustodyBalance {
            token: needed.token().address(),
            required: needed.amount(),
            available,
        });
    }
    Ok(())
}
