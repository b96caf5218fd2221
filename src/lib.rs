//! # Hydra Router
//!
//! Router core for AMM venues: quote swaps, execute them behind an output
//! floor, manage liquidity positions and run flash swaps that repay within
//! the same atomic operation.
//!
//! The router never owns balances. Tokens live in an external ledger and
//! pools live in an external venue; both are reached through the traits in
//! [`traits`], and every mutating operation runs inside an
//! [`ExecutionEnvironment`](traits::ExecutionEnvironment) that discards all
//! of its effects on failure.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `sandbox` | yes | In-memory ledger, constant-product venue and snapshot environment |
//!
//! # Quick Start
//!
//! ```rust
//! use hydra_router::prelude::*;
//!
//! let dai = Token::new(Address::repeat_byte(0x6b), Decimals::new(18).expect("valid"));
//! let wbtc = Token::new(Address::repeat_byte(0x22), Decimals::new(8).expect("valid"));
//! let pair = TokenPair::new(dai, wbtc).expect("distinct tokens");
//! let custody = Address::repeat_byte(0xc5);
//!
//! // 1. A sandbox venue with one DAI/WBTC pool
//! let mut sandbox = Sandbox::with_venue(Address::repeat_byte(0xee));
//! sandbox.register_token(dai).expect("dai");
//! sandbox.register_token(wbtc).expect("wbtc");
//! sandbox.fund(&dai, custody, dai.units(100_000).amount()).expect("funded");
//! let (first, second) = pair
//!     .sort_amounts(&dai, dai.units(2_800_000).amount(), wbtc.units(100).amount())
//!     .expect("sorted");
//! let pool = PoolConfig::new(pair, FeeTier::TIER_0_30_PERCENT, first, second).expect("pool");
//! sandbox.open_pool(&pool, Address::repeat_byte(0x1f)).expect("opened");
//!
//! // 2. Quote, then swap with the quote as the floor
//! let mut router = Router::new(sandbox, RouterConfig::new(custody)).expect("router");
//! let quote = router.get_max_output(dai.units(25_000), wbtc).expect("quote");
//! let request = SwapRequest::new(
//!     pair,
//!     dai.units(25_000),
//!     OutputFloor::at_least(quote.amount()),
//!     custody,
//! )
//! .expect("valid request");
//! let receipt = router.swap_tokens(request).expect("swap");
//!
//! assert_eq!(receipt.amount_out(), quote);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │    Caller     │  SwapRequest, LiquidityRequest, FlashSwapRequest
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │    Router     │  quote · swap · liquidity · flash swap
//! └──────┬───────┘
//!        │ execute_atomic
//!        ▼
//! ┌──────────────┐
//! │  Environment  │  all-or-nothing commit
//! └──┬────────┬──┘
//!    ▼        ▼
//! ┌──────┐ ┌──────┐
//! │Ledger│ │Venue │──▶ FlashSwapCallback (back into the router)
//! └──────┘ └──────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Validated value types: [`Amount`](domain::Amount), [`Token`](domain::Token), requests, receipts |
//! | [`traits`] | Collaborator seams: [`TokenLedger`](traits::TokenLedger), [`AmmVenue`](traits::AmmVenue), [`ExecutionEnvironment`](traits::ExecutionEnvironment) |
//! | [`config`] | [`RouterConfig`](config::RouterConfig) and [`PoolConfig`](config::PoolConfig) |
//! | [`router`] | The [`Router`](router::Router) facade |
//! | [`pools`] | [`ConstantProductPool`](pools::ConstantProductPool) pricing curve |
//! | [`math`] | Checked arithmetic and 256-bit `mul_div` |
//! | [`error`] | [`RouterError`](error::RouterError) |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod domain;
pub mod error;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod router;
#[cfg(feature = "sandbox")]
pub mod sandbox;
pub mod traits;
