//! Domain value types used throughout the router.
//!
//! Tokens, amounts, pairs, fees, request types and receipts. All types use
//! newtypes with validated constructors to enforce invariants.

mod amount;
mod basis_points;
mod decimals;
mod fee_tier;
mod flash_swap;
mod liquidity_request;
mod receipt;
mod rounding;
mod swap_request;
mod token;
mod token_amount;
mod token_pair;

pub use alloy_primitives::Address;
pub use amount::Amount;
pub use basis_points::BasisPoints;
pub use decimals::Decimals;
pub use fee_tier::FeeTier;
pub use flash_swap::{
    FlashLeg, FlashLoan, FlashSwapRequest, FlashSwapState, RepaymentObligation, RepaymentToken,
};
pub use liquidity_request::{LiquidityRequest, RemoveLiquidityRequest};
pub use receipt::{FlashSwapReceipt, LiquidityReceipt, SwapReceipt, WithdrawalReceipt};
pub use rounding::Rounding;
pub use swap_request::{OutputFloor, SwapRequest};
pub use token::Token;
pub use token_amount::TokenAmount;
pub use token_pair::TokenPair;
