//! Liquidity manager.
//!
//! Minimums are handed to the venue untouched; the venue picks the
//! ratio-preserving amounts and rejects anything below them. Results come
//! back in the caller's token order.

use tracing::info;

use super::approval::{with_exact_allowance, Grant};
use super::{ensure_balance, Router};
use crate::domain::{
    Address, Amount, LiquidityReceipt, LiquidityRequest, RemoveLiquidityRequest, Token,
    TokenAmount, TokenPair, WithdrawalReceipt,
};
use crate::error::{Result, RouterError};
use crate::traits::{AmmVenue, ExecutionEnvironment, TokenLedger};

impl<E: ExecutionEnvironment> Router<E> {
    /// Deposits up to the desired amounts from custody and mints position
    /// tokens to the request's recipient.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnsupportedPair`] if the venue has no pool.
    /// - [`RouterError::InsufficientCustodyBalance`] if custody cannot
    ///   cover a minimum, or the amounts the venue actually draws.
    /// - [`RouterError::SlippageExceeded`] if the venue's ratio pushes an
    ///   amount below its minimum.
    /// - [`RouterError::VenueViolation`] if balances disagree with the
    ///   venue's receipt.
    pub fn add_liquidity(&mut self, request: LiquidityRequest) -> Result<LiquidityReceipt> {
        let pair = request.pair()?;
        let custody = self.config.custody;
        let reset = self.config.reset_approvals;

        let receipt = self.env.execute_atomic(|ledger, venue| {
            if !venue.supports(&pair) {
                return Err(RouterError::UnsupportedPair);
            }
            let desired_a = request.desired_a();
            let desired_b = request.desired_b();
            // the venue draws the ratio-preserving amounts, not the desired ones
            ensure_balance(ledger, custody, TokenAmount::new(desired_a.token(), request.min_a()))?;
            ensure_balance(ledger, custody, TokenAmount::new(desired_b.token(), request.min_b()))?;

            let position = venue.liquidity_token(&pair)?;
            let a_before = ledger.balance_of(&desired_a.token(), custody);
            let b_before = ledger.balance_of(&desired_b.token(), custody);
            let position_before = ledger.balance_of(&position, request.recipient());

            let spender = venue.address();
            let grant_a = Grant {
                token: desired_a.token(),
                owner: custody,
                spender,
                amount: desired_a.amount(),
            };
            let grant_b = Grant {
                token: desired_b.token(),
                owner: custody,
                spender,
                amount: desired_b.amount(),
            };
            let receipt = with_exact_allowance(ledger, grant_a, reset, |ledger| {
                with_exact_allowance(ledger, grant_b, reset, |ledger| {
                    venue.add_liquidity(ledger, custody, &request)
                })
            })?;

            expect_spent(ledger, custody, receipt.used_a(), a_before)?;
            expect_spent(ledger, custody, receipt.used_b(), b_before)?;
            let minted = ledger
                .balance_of(&position, request.recipient())
                .checked_sub(&position_before)
                .ok_or(RouterError::VenueViolation("position balance fell"))?;
            if minted != receipt.liquidity() {
                return Err(RouterError::VenueViolation(
                    "minted position differs from the receipt",
                ));
            }
            Ok(receipt)
        })?;

        info!(
            used_a = %receipt.used_a(),
            used_b = %receipt.used_b(),
            liquidity = %receipt.liquidity(),
            "liquidity added"
        );
        Ok(receipt)
    }

    /// Burns `request.liquidity()` position tokens held by custody and
    /// pays the underlying tokens to the request's recipient.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnsupportedPair`] if the venue has no pool.
    /// - [`RouterError::InsufficientCustodyBalance`] if custody holds fewer
    ///   position tokens.
    /// - [`RouterError::InsufficientLiquidityReturn`] if a payout is below
    ///   its minimum.
    pub fn remove_liquidity(&mut self, request: RemoveLiquidityRequest) -> Result<WithdrawalReceipt> {
        let custody = self.config.custody;
        let reset = self.config.reset_approvals;
        let receipt = self
            .env
            .execute_atomic(|ledger, venue| withdraw(ledger, venue, custody, reset, &request))?;
        log_withdrawal(&receipt);
        Ok(receipt)
    }

    /// Removes every position token custody holds for the pair of
    /// `token_a` and `token_b`. The balance is read inside the operation.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidQuantity`] if custody holds no position.
    /// - Everything [`remove_liquidity`](Self::remove_liquidity) returns.
    pub fn remove_all_liquidity(
        &mut self,
        token_a: Token,
        token_b: Token,
        min_a: Amount,
        min_b: Amount,
        recipient: Address,
    ) -> Result<WithdrawalReceipt> {
        let pair = TokenPair::new(token_a, token_b)?;
        let custody = self.config.custody;
        let reset = self.config.reset_approvals;

        let receipt = self.env.execute_atomic(|ledger, venue| {
            if !venue.supports(&pair) {
                return Err(RouterError::UnsupportedPair);
            }
            let position = venue.liquidity_token(&pair)?;
            let held = ledger.balance_of(&position, custody);
            if held.is_zero() {
                return Err(RouterError::InvalidQuantity(
                    "custody holds no position in this pool",
                ));
            }
            let request =
                RemoveLiquidityRequest::new(token_a, token_b, held, min_a, min_b, recipient)?;
            withdraw(ledger, venue, custody, reset, &request)
        })?;
        log_withdrawal(&receipt);
        Ok(receipt)
    }
}

fn withdraw(
    ledger: &mut dyn TokenLedger,
    venue: &mut dyn AmmVenue,
    custody: Address,
    reset: bool,
    request: &RemoveLiquidityRequest,
) -> Result<WithdrawalReceipt> {
    let pair = request.pair()?;
    if !venue.supports(&pair) {
        return Err(RouterError::UnsupportedPair);
    }
    let position = venue.liquidity_token(&pair)?;
    let burned = TokenAmount::new(position, request.liquidity());
    ensure_balance(ledger, custody, burned)?;

    let recipient = request.recipient();
    let position_before = ledger.balance_of(&position, custody);
    let a_before = ledger.balance_of(&request.token_a(), recipient);
    let b_before = ledger.balance_of(&request.token_b(), recipient);

    let grant = Grant {
        token: position,
        owner: custody,
        spender: venue.address(),
        amount: request.liquidity(),
    };
    let receipt = with_exact_allowance(ledger, grant, reset, |ledger| {
        venue.remove_liquidity(ledger, custody, request)
    })?;

    expect_spent(ledger, custody, burned, position_before)?;
    for (paid, before) in [(receipt.amount_a(), a_before), (receipt.amount_b(), b_before)] {
        let gained = ledger
            .balance_of(&paid.token(), recipient)
            .checked_sub(&before)
            .ok_or(RouterError::VenueViolation("recipient balance fell"))?;
        if gained != paid.amount() {
            return Err(RouterError::VenueViolation(
                "withdrawal payout differs from the receipt",
            ));
        }
    }
    Ok(receipt)
}

/// Fails unless `owner`'s balance dropped by exactly `spent` since `before`.
fn expect_spent(
    ledger: &dyn TokenLedger,
    owner: Address,
    spent: TokenAmount,
    before: Amount,
) -> Result<()> {
    let after = ledger.balance_of(&spent.token(), owner);
    if before.checked_sub(&after) != Some(spent.amount()) {
        return Err(RouterError::VenueViolation(
            "custody debit differs from the venue's receipt",
        ));
    }
    Ok(())
}

fn log_withdrawal(receipt: &WithdrawalReceipt) {
    info!(
        amount_a = %receipt.amount_a(),
        amount_b = %receipt.amount_b(),
        burned = %receipt.liquidity_burned(),
        "liquidity removed"
    );
}
