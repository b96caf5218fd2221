//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use hydra_router::prelude::*;
//! ```

pub use crate::domain::{
    Address, Amount, BasisPoints, Decimals, FeeTier, FlashLoan, FlashSwapReceipt,
    FlashSwapRequest, FlashSwapState, LiquidityReceipt, LiquidityRequest, OutputFloor,
    RemoveLiquidityRequest, RepaymentObligation, RepaymentToken, Rounding, SwapReceipt,
    SwapRequest, Token, TokenAmount, TokenPair, WithdrawalReceipt,
};

pub use crate::traits::{AmmVenue, ExecutionEnvironment, FlashSwapCallback, FromConfig, TokenLedger};

pub use crate::math::CheckedArithmetic;

pub use crate::config::{PoolConfig, RouterConfig};

pub use crate::error::{Result, RouterError};

pub use crate::router::Router;

#[cfg(feature = "sandbox")]
pub use crate::sandbox::{ConstantProductVenue, InMemoryLedger, Sandbox};
