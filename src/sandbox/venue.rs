//! In-memory constant-product venue.
//!
//! Each pool keeps its books in a [`ConstantProductPool`]; token movements
//! go through the ledger handed in on every call. The venue's own ledger
//! account holds the reserves of every pool it runs, so flash-loan
//! settlement works on balance deltas rather than absolute balances.
//!
//! # Flash Loan Sequence
//!
//! 1. Refuse if the pool is locked, then compute every obligation.
//! 2. Snapshot the venue's balances of both pair tokens.
//! 3. Lock, disburse the legs, invoke the callback, unlock.
//! 4. For each token require `after >= before - borrowed + owed`.
//! 5. Book the balance deltas into the pool's reserves.

use std::collections::HashMap;

use tracing::{debug, info};

use super::InMemoryLedger;
use crate::config::PoolConfig;
use crate::domain::{
    Address, Amount, Decimals, FlashLeg, FlashLoan, FlashSwapRequest, LiquidityReceipt,
    LiquidityRequest, RemoveLiquidityRequest, RepaymentObligation, SwapRequest, Token,
    TokenAmount, TokenPair, WithdrawalReceipt,
};
use crate::error::{Result, RouterError};
use crate::math::CheckedArithmetic;
use crate::pools::ConstantProductPool;
use crate::traits::{AmmVenue, FlashSwapCallback, FromConfig, TokenLedger};

/// Precision of every position token the venue issues.
const LIQUIDITY_TOKEN_DECIMALS: u8 = 18;

#[derive(Debug, Clone)]
struct PoolEntry {
    pool: ConstantProductPool,
    liquidity_token: Token,
    locked: bool,
}

impl PoolEntry {
    /// Every mutating entry point goes through this while a loan is out.
    /// The in-memory callback sees only the ledger, so only a venue wired
    /// to callers that keep a handle on it can trip the lock.
    fn ensure_unlocked(&self) -> Result<()> {
        if self.locked {
            return Err(RouterError::PoolLocked);
        }
        Ok(())
    }
}

/// A venue running one constant-product pool per token pair.
#[derive(Debug, Clone)]
pub struct ConstantProductVenue {
    address: Address,
    pools: HashMap<TokenPair, PoolEntry>,
}

impl ConstantProductVenue {
    /// Creates a venue with no pools, trading from `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            pools: HashMap::new(),
        }
    }

    /// Opens a pool seeded with the configured reserves.
    ///
    /// The reserves are credited to the venue's ledger account, the
    /// position token is registered at `liquidity_address` with the venue
    /// as issuer, and the initial supply is minted to the venue itself.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidConfiguration`] if the pair already has a pool.
    /// - [`RouterError::InvalidToken`] if a pair token is not registered on
    ///   the ledger or `liquidity_address` is taken.
    pub fn open_pool(
        &mut self,
        ledger: &mut InMemoryLedger,
        config: &PoolConfig,
        liquidity_address: Address,
    ) -> Result<Token> {
        let pair = *config.pair();
        if self.pools.contains_key(&pair) {
            return Err(RouterError::InvalidConfiguration(
                "pair already has a pool",
            ));
        }
        if !ledger.is_registered(&pair.first()) || !ledger.is_registered(&pair.second()) {
            return Err(RouterError::InvalidToken("pool token is not registered"));
        }
        let pool = ConstantProductPool::from_config(config)?;
        let liquidity_token = Token::new(liquidity_address, Decimals::new(LIQUIDITY_TOKEN_DECIMALS)?);

        ledger.register_token(liquidity_token, Some(self.address))?;
        ledger.credit(&pair.first(), self.address, pool.reserve_first())?;
        ledger.credit(&pair.second(), self.address, pool.reserve_second())?;
        ledger.mint(&liquidity_token, self.address, self.address, pool.total_supply())?;

        info!(
            first = %pair.first().address(),
            second = %pair.second().address(),
            fee = %pool.fee_tier(),
            supply = %pool.total_supply(),
            "pool opened"
        );
        self.pools.insert(
            pair,
            PoolEntry {
                pool,
                liquidity_token,
                locked: false,
            },
        );
        Ok(liquidity_token)
    }

    /// Returns the pool for `pair`, if any.
    #[must_use]
    pub fn pool(&self, pair: &TokenPair) -> Option<&ConstantProductPool> {
        self.pools.get(pair).map(|e| &e.pool)
    }

    /// Returns `true` while a flash loan on `pair` is in flight.
    #[must_use]
    pub fn is_locked(&self, pair: &TokenPair) -> bool {
        self.pools.get(pair).is_some_and(|e| e.locked)
    }

    fn entry(&self, pair: &TokenPair) -> Result<&PoolEntry> {
        self.pools.get(pair).ok_or(RouterError::UnsupportedPair)
    }

    fn entry_mut(&mut self, pair: &TokenPair) -> Result<&mut PoolEntry> {
        let entry = self.pools.get_mut(pair).ok_or(RouterError::UnsupportedPair)?;
        entry.ensure_unlocked()?;
        Ok(entry)
    }
}

/// Repayment tokens a leg of `pair` may be settled in.
///
/// A one-sided loan may be repaid in either token; a two-sided loan only in
/// the tokens borrowed, since pricing one leg in the other would depend on
/// the order of settlement.
fn accepted_for(pair: &TokenPair, two_sided: bool, borrowed: &Token) -> Result<Vec<Token>> {
    if !pair.contains(borrowed) {
        return Err(RouterError::InvalidToken("borrowed token not in pool pair"));
    }
    if two_sided {
        Ok(vec![*borrowed])
    } else {
        Ok(vec![*borrowed, pair.other(borrowed)?])
    }
}

/// Sum of `amounts` whose token is `token`.
fn total_in(token: &Token, amounts: impl Iterator<Item = TokenAmount>) -> Result<Amount> {
    amounts
        .filter(|a| a.token() == *token)
        .try_fold(Amount::ZERO, |acc, a| acc.safe_add(&a.amount()))
}

/// `reserve + (after - before)` without leaving unsigned arithmetic.
fn apply_delta(reserve: Amount, before: Amount, after: Amount) -> Result<Amount> {
    if after >= before {
        reserve.safe_add(&after.safe_sub(&before)?)
    } else {
        reserve.safe_sub(&before.safe_sub(&after)?)
    }
}

impl AmmVenue for ConstantProductVenue {
    fn address(&self) -> Address {
        self.address
    }

    fn supports(&self, pair: &TokenPair) -> bool {
        self.pools.contains_key(pair)
    }

    fn liquidity_token(&self, pair: &TokenPair) -> Result<Token> {
        Ok(self.entry(pair)?.liquidity_token)
    }

    fn get_amount_out(&self, amount_in: TokenAmount, token_out: &Token) -> Result<Amount> {
        let pair = TokenPair::new(amount_in.token(), *token_out)?;
        self.entry(&pair)?.pool.quote_exact_in(amount_in)
    }

    fn swap_exact_tokens_for_tokens(
        &mut self,
        ledger: &mut dyn TokenLedger,
        payer: Address,
        request: &SwapRequest,
    ) -> Result<Amount> {
        let venue = self.address;
        let entry = self.entry_mut(request.pair())?;
        let amount_in = request.amount_in();
        let token_out = request.token_out();

        let amount_out = entry.pool.quote_exact_in(amount_in)?;
        let floor = request.floor();
        if !floor.admits(amount_out) {
            return Err(RouterError::SlippageExceeded {
                minimum: floor.minimum(),
                actual: amount_out,
            });
        }

        ledger.transfer_from(
            &amount_in.token(),
            venue,
            payer,
            venue,
            amount_in.amount(),
        )?;
        ledger.transfer(&token_out, venue, request.recipient(), amount_out)?;
        entry.pool.swap_exact_in(amount_in)?;

        debug!(%amount_in, %amount_out, recipient = %request.recipient(), "venue swap");
        Ok(amount_out)
    }

    fn add_liquidity(
        &mut self,
        ledger: &mut dyn TokenLedger,
        provider: Address,
        request: &LiquidityRequest,
    ) -> Result<LiquidityReceipt> {
        let venue = self.address;
        let pair = request.pair()?;
        let entry = self.entry_mut(&pair)?;
        let token_a = request.desired_a().token();
        let desired = pair.sort_amounts(
            &token_a,
            request.desired_a().amount(),
            request.desired_b().amount(),
        )?;
        let minimum = pair.sort_amounts(&token_a, request.min_a(), request.min_b())?;

        let (used_first, used_second) = entry.pool.quote_deposit(desired, minimum)?;
        ledger.transfer_from(&pair.first(), venue, provider, venue, used_first)?;
        ledger.transfer_from(&pair.second(), venue, provider, venue, used_second)?;
        let minted = entry.pool.deposit(used_first, used_second)?;
        ledger.mint(&entry.liquidity_token, venue, request.recipient(), minted)?;

        let (used_a, used_b) = pair.sort_amounts(&token_a, used_first, used_second)?;
        debug!(%used_a, %used_b, %minted, "venue deposit");
        Ok(LiquidityReceipt::new(
            TokenAmount::new(token_a, used_a),
            TokenAmount::new(request.desired_b().token(), used_b),
            minted,
        ))
    }

    fn remove_liquidity(
        &mut self,
        ledger: &mut dyn TokenLedger,
        provider: Address,
        request: &RemoveLiquidityRequest,
    ) -> Result<WithdrawalReceipt> {
        let venue = self.address;
        let pair = request.pair()?;
        let entry = self.entry_mut(&pair)?;
        let token_a = request.token_a();
        let token_b = request.token_b();
        let liquidity = request.liquidity();

        let (first, second) = entry.pool.quote_withdrawal(liquidity)?;
        let (out_a, out_b) = pair.sort_amounts(&token_a, first, second)?;
        for (token, minimum, actual) in [
            (token_a, request.min_a(), out_a),
            (token_b, request.min_b(), out_b),
        ] {
            if actual < minimum {
                return Err(RouterError::InsufficientLiquidityReturn {
                    token: token.address(),
                    minimum,
                    actual,
                });
            }
        }

        let lp = entry.liquidity_token;
        ledger.transfer_from(&lp, venue, provider, venue, liquidity)?;
        ledger.burn(&lp, venue, venue, liquidity)?;
        entry.pool.withdraw(liquidity)?;
        ledger.transfer(&token_a, venue, request.recipient(), out_a)?;
        ledger.transfer(&token_b, venue, request.recipient(), out_b)?;

        debug!(%out_a, %out_b, %liquidity, "venue withdrawal");
        Ok(WithdrawalReceipt::new(
            TokenAmount::new(token_a, out_a),
            TokenAmount::new(token_b, out_b),
            liquidity,
        ))
    }

    fn accepted_repayment_tokens(
        &self,
        request: &FlashSwapRequest,
        borrowed: &Token,
    ) -> Result<Vec<Token>> {
        self.entry(request.pair())?;
        accepted_for(request.pair(), request.is_two_sided(), borrowed)
    }

    fn flash_loan(
        &mut self,
        ledger: &mut dyn TokenLedger,
        borrower: Address,
        pair: &TokenPair,
        legs: &[FlashLeg],
        callback: &mut dyn FlashSwapCallback,
    ) -> Result<Vec<RepaymentObligation>> {
        let venue = self.address;
        let entry = self.entry_mut(pair)?;
        if legs.is_empty() || legs.len() > 2 {
            return Err(RouterError::EmptyFlashSwap);
        }
        let two_sided = legs.len() == 2;
        if two_sided && legs[0].borrowed.token() == legs[1].borrowed.token() {
            return Err(RouterError::InvalidToken("each token may be borrowed once"));
        }

        let mut obligations = Vec::with_capacity(legs.len());
        for leg in legs {
            if leg.borrowed.is_zero() {
                return Err(RouterError::EmptyFlashSwap);
            }
            let accepted = accepted_for(pair, two_sided, &leg.borrowed.token())?;
            if !accepted.contains(&leg.repay_in) {
                return Err(RouterError::InvalidToken("repayment token not accepted"));
            }
            let (owed, fee) = entry.pool.flash_repayment(leg.borrowed, &leg.repay_in)?;
            obligations.push(RepaymentObligation::new(
                leg.borrowed,
                TokenAmount::new(leg.repay_in, owed),
                fee,
            )?);
        }

        let tokens = [pair.first(), pair.second()];
        let before = tokens.map(|t| ledger.balance_of(&t, venue));

        entry.locked = true;
        let outcome = disburse_and_call(ledger, venue, borrower, pair, &obligations, callback);
        entry.locked = false;
        outcome?;

        let mut reserves = [entry.pool.reserve_first(), entry.pool.reserve_second()];
        for (i, token) in tokens.iter().enumerate() {
            let borrowed = total_in(token, obligations.iter().map(RepaymentObligation::borrowed))?;
            let owed = total_in(token, obligations.iter().map(RepaymentObligation::owed))?;
            let after = ledger.balance_of(token, venue);
            let floor = before[i].safe_sub(&borrowed)?;
            let repaid = after.checked_sub(&floor).unwrap_or(Amount::ZERO);
            if repaid < owed {
                return Err(RouterError::FlashSwapUnpaid {
                    token: token.address(),
                    owed,
                    available: repaid,
                });
            }
            reserves[i] = apply_delta(reserves[i], before[i], after)?;
        }
        entry.pool.sync(reserves[0], reserves[1]);

        debug!(%borrower, legs = obligations.len(), "flash loan repaid");
        Ok(obligations)
    }
}

fn disburse_and_call(
    ledger: &mut dyn TokenLedger,
    venue: Address,
    borrower: Address,
    pair: &TokenPair,
    obligations: &[RepaymentObligation],
    callback: &mut dyn FlashSwapCallback,
) -> Result<()> {
    for obligation in obligations {
        let leg = obligation.borrowed();
        ledger.transfer(&leg.token(), venue, borrower, leg.amount())?;
    }
    let loan = FlashLoan::new(venue, borrower, *pair, obligations.to_vec());
    callback.on_flash_loan(ledger, &loan)
}
