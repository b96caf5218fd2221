//! AMM venue seam.
//!
//! The venue owns pool reserves, the pricing curve and position-token
//! accounting. The router reaches it only through [`AmmVenue`], and hands
//! it the ledger explicitly on every mutating call so a venue never holds
//! a reference to shared state between calls.
//!
//! # Venue Guarantees
//!
//! - A swap, deposit or withdrawal either completes or fails without
//!   moving tokens.
//! - Minimums are enforced by the venue itself: a swap below its floor
//!   fails with `SlippageExceeded`, a deposit below its minimums with
//!   `SlippageExceeded`, a withdrawal with `InsufficientLiquidityReturn`.
//! - [`AmmVenue::flash_loan`] disburses, invokes the callback synchronously,
//!   then verifies repayment from ledger balances before returning.

use super::{FlashSwapCallback, TokenLedger};
use crate::domain::{
    Address, Amount, FlashLeg, FlashSwapRequest, LiquidityReceipt, LiquidityRequest,
    RemoveLiquidityRequest, RepaymentObligation, SwapRequest, Token, TokenAmount, TokenPair,
    WithdrawalReceipt,
};
use crate::error::Result;

/// Quote, swap, liquidity and flash-loan primitives of a single venue.
pub trait AmmVenue {
    /// The venue's own account on the ledger.
    #[must_use]
    fn address(&self) -> Address;

    /// Returns `true` if the venue has a pool for `pair`.
    #[must_use]
    fn supports(&self, pair: &TokenPair) -> bool;

    /// The position token minted for deposits into `pair`'s pool.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPair` if there is no such pool.
    fn liquidity_token(&self, pair: &TokenPair) -> Result<Token>;

    /// Output for selling exactly `amount_in` into the pool against `token_out`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedPair` if there is no pool for the two tokens.
    /// - `InsufficientLiquidity` if the pool cannot produce any output.
    fn get_amount_out(&self, amount_in: TokenAmount, token_out: &Token) -> Result<Amount>;

    /// Pulls `request.amount_in()` from `payer` through its allowance and
    /// delivers the output to `request.recipient()`. Returns the output.
    ///
    /// # Errors
    ///
    /// - `SlippageExceeded` if the output is below the request's floor.
    /// - `AuthorizationFailed` if `payer`'s allowance is short.
    fn swap_exact_tokens_for_tokens(
        &mut self,
        ledger: &mut dyn TokenLedger,
        payer: Address,
        request: &SwapRequest,
    ) -> Result<Amount>;

    /// Pulls the ratio-preserving amounts from `provider` and mints position
    /// tokens to the request's recipient.
    ///
    /// # Errors
    ///
    /// - `SlippageExceeded` if an optimal amount falls below its minimum.
    /// - `AuthorizationFailed` if `provider`'s allowances are short.
    fn add_liquidity(
        &mut self,
        ledger: &mut dyn TokenLedger,
        provider: Address,
        request: &LiquidityRequest,
    ) -> Result<LiquidityReceipt>;

    /// Pulls position tokens from `provider`, burns them and pays out the
    /// underlying tokens to the request's recipient.
    ///
    /// # Errors
    ///
    /// - `InsufficientLiquidityReturn` if a payout is below its minimum.
    /// - `AuthorizationFailed` if `provider`'s allowance is short.
    fn remove_liquidity(
        &mut self,
        ledger: &mut dyn TokenLedger,
        provider: Address,
        request: &RemoveLiquidityRequest,
    ) -> Result<WithdrawalReceipt>;

    /// Tokens the venue accepts as repayment for the `borrowed` leg of `request`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPair` if there is no pool for the request's pair.
    fn accepted_repayment_tokens(
        &self,
        request: &FlashSwapRequest,
        borrowed: &Token,
    ) -> Result<Vec<Token>>;

    /// Disburses `legs` to `borrower`, invokes `callback` and verifies that
    /// every obligation was repaid. Returns the discharged obligations.
    ///
    /// # Errors
    ///
    /// - `PoolLocked` if a flash loan on the same pool is in flight.
    /// - `FlashSwapUnpaid` if a repayment is missing after the callback.
    /// - Any error the callback returns.
    fn flash_loan(
        &mut self,
        ledger: &mut dyn TokenLedger,
        borrower: Address,
        pair: &TokenPair,
        legs: &[FlashLeg],
        callback: &mut dyn FlashSwapCallback,
    ) -> Result<Vec<RepaymentObligation>>;
}
