//! Constant-product pricing curve (Uniswap V2 style).
//!
//! The swap invariant is `x × y = k` where `x` and `y` are the reserves of
//! the two tokens. Fees are deducted from the input amount **before** the
//! pricing formula is applied.
//!
//! # Swap Algorithm (token in → token out)
//!
//! 1. `fee = ceil(amount_in × fee_bps / 10 000)`
//! 2. `net_input = amount_in − fee`
//! 3. `amount_out = floor(reserve_out × net_input / (reserve_in + net_input))`
//! 4. `reserve_in += amount_in` (fee stays in the pool)
//! 5. `reserve_out -= amount_out`
//!
//! # Invariant
//!
//! After every swap `k_after ≥ k_before`, because the fee grows reserves
//! without a matching output.
//!
//! All products are taken in 256 bits through [`mul_div`].

use crate::config::PoolConfig;
use crate::domain::{Amount, FeeTier, Rounding, Token, TokenAmount, TokenPair};
use crate::error::RouterError;
use crate::math::{mul_div, sqrt_product, CheckedArithmetic};
use crate::traits::FromConfig;

/// Basis-point denominator (10 000 = 100%).
const BPS_DENOMINATOR: u128 = 10_000;

/// Reserves and position-token supply of one constant-product pool.
///
/// `quote_*` methods are pure; `swap_exact_in`, `deposit`, `withdraw` and
/// `sync` mutate the reserves. Token movements on the ledger are the
/// venue's job; the pool only keeps the books.
///
/// # Example
///
/// ```rust
/// use hydra_router::config::PoolConfig;
/// use hydra_router::domain::{Address, Amount, Decimals, FeeTier, Token, TokenPair};
/// use hydra_router::pools::ConstantProductPool;
/// use hydra_router::traits::FromConfig;
///
/// let a = Token::new(Address::repeat_byte(1), Decimals::new(18).expect("ok"));
/// let b = Token::new(Address::repeat_byte(2), Decimals::new(6).expect("ok"));
/// let pair = TokenPair::new(a, b).expect("distinct");
/// let cfg = PoolConfig::new(pair, FeeTier::TIER_0_30_PERCENT, Amount::new(1_000_000), Amount::new(2_000_000))
///     .expect("valid config");
///
/// let pool = ConstantProductPool::from_config(&cfg).expect("pool created");
/// let out = pool.quote_exact_in(a.raw(1_000)).expect("quote ok");
/// assert!(out.get() > 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantProductPool {
    pair: TokenPair,
    fee_tier: FeeTier,
    reserve_first: Amount,
    reserve_second: Amount,
    total_supply: Amount,
}

impl ConstantProductPool {
    /// Returns the pool's pair.
    #[must_use]
    pub const fn pair(&self) -> &TokenPair {
        &self.pair
    }

    /// Returns the swap fee tier.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    /// Returns the reserve of `pair.first()`.
    pub const fn reserve_first(&self) -> Amount {
        self.reserve_first
    }

    /// Returns the reserve of `pair.second()`.
    pub const fn reserve_second(&self) -> Amount {
        self.reserve_second
    }

    /// Returns the outstanding position-token supply.
    pub const fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Returns the reserve of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidToken`] if `token` is not in the pair.
    pub fn reserve_of(&self, token: &Token) -> Result<Amount, RouterError> {
        if *token == self.pair.first() {
            Ok(self.reserve_first)
        } else if *token == self.pair.second() {
            Ok(self.reserve_second)
        } else {
            Err(RouterError::InvalidToken("token not in pool pair"))
        }
    }

    /// `(reserve_in, reserve_out)` for a trade selling `token_in`.
    fn oriented_reserves(&self, token_in: &Token) -> Result<(Amount, Amount), RouterError> {
        let reserve_in = self.reserve_of(token_in)?;
        let reserve_out = self.reserve_of(&self.pair.other(token_in)?)?;
        Ok((reserve_in, reserve_out))
    }

    /// Output for selling exactly `amount_in`.
    ///
    /// # Errors
    ///
    /// - [`RouterError::ZeroInput`] if the input is zero.
    /// - [`RouterError::InvalidToken`] if the input token is not in the pair.
    /// - [`RouterError::InsufficientLiquidity`] if the output rounds to zero
    ///   or would drain the reserve.
    pub fn quote_exact_in(&self, amount_in: TokenAmount) -> Result<Amount, RouterError> {
        if amount_in.is_zero() {
            return Err(RouterError::ZeroInput);
        }
        let (reserve_in, reserve_out) = self.oriented_reserves(&amount_in.token())?;
        let amount_in = amount_in.amount();

        let fee = self.fee_tier.apply_to_amount(amount_in, Rounding::Up)?;
        let net_input = amount_in.safe_sub(&fee)?;
        if net_input.is_zero() {
            return Err(RouterError::InsufficientLiquidity);
        }

        let denominator = reserve_in.safe_add(&net_input)?;
        let amount_out = Amount::new(mul_div(
            reserve_out.get(),
            net_input.get(),
            denominator.get(),
            Rounding::Down,
        )?);

        if amount_out.is_zero() || amount_out >= reserve_out {
            return Err(RouterError::InsufficientLiquidity);
        }
        Ok(amount_out)
    }

    /// Input of `token_in` needed to buy exactly `amount_out` of the other
    /// token. Returns `(amount_in, fee)`.
    ///
    /// Formula: `net = ceil(reserve_in × amount_out / (reserve_out − amount_out))`,
    /// then `amount_in = ceil(net × 10 000 / (10 000 − fee_bps))`.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidToken`] if a token is not in the pair.
    /// - [`RouterError::InsufficientLiquidity`] if `amount_out` would drain
    ///   the reserve.
    pub fn quote_exact_out(
        &self,
        token_in: &Token,
        amount_out: Amount,
    ) -> Result<(Amount, Amount), RouterError> {
        let (reserve_in, reserve_out) = self.oriented_reserves(token_in)?;
        if amount_out >= reserve_out {
            return Err(RouterError::InsufficientLiquidity);
        }
        let remaining = reserve_out.safe_sub(&amount_out)?;
        let net = mul_div(
            reserve_in.get(),
            amount_out.get(),
            remaining.get(),
            Rounding::Up,
        )?;
        let complement = self.fee_complement()?;
        let amount_in = mul_div(net, BPS_DENOMINATOR, complement, Rounding::Up)?;
        let fee = Amount::new(amount_in).safe_sub(&Amount::new(net))?;
        Ok((Amount::new(amount_in), fee))
    }

    /// Sells exactly `amount_in` and books the reserves. Returns the output.
    ///
    /// # Errors
    ///
    /// Everything [`quote_exact_in`](Self::quote_exact_in) returns.
    pub fn swap_exact_in(&mut self, amount_in: TokenAmount) -> Result<Amount, RouterError> {
        let amount_out = self.quote_exact_in(amount_in)?;
        let (reserve_in, reserve_out) = self.oriented_reserves(&amount_in.token())?;
        let new_in = reserve_in.safe_add(&amount_in.amount())?;
        let new_out = reserve_out.safe_sub(&amount_out)?;
        if self.pair.is_first(&amount_in.token()) {
            self.reserve_first = new_in;
            self.reserve_second = new_out;
        } else {
            self.reserve_second = new_in;
            self.reserve_first = new_out;
        }
        Ok(amount_out)
    }

    /// Ratio-preserving deposit for the desired amounts, in canonical order.
    ///
    /// Follows the Uniswap V2 router: keep all of `desired_first` if the
    /// matching second amount fits, otherwise keep all of `desired_second`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::SlippageExceeded`] if the chosen amount on
    /// the adjusted side is below its minimum.
    pub fn quote_deposit(
        &self,
        desired: (Amount, Amount),
        minimum: (Amount, Amount),
    ) -> Result<(Amount, Amount), RouterError> {
        if self.reserve_first.is_zero() && self.reserve_second.is_zero() {
            return Ok(desired);
        }
        let second_optimal = mul_div(
            desired.0.get(),
            self.reserve_second.get(),
            self.reserve_first.get(),
            Rounding::Down,
        )?;
        if second_optimal <= desired.1.get() {
            check_minimum(minimum.1, Amount::new(second_optimal))?;
            return Ok((desired.0, Amount::new(second_optimal)));
        }
        let first_optimal = mul_div(
            desired.1.get(),
            self.reserve_first.get(),
            self.reserve_second.get(),
            Rounding::Down,
        )?;
        // second_optimal > desired.1 implies first_optimal <= desired.0
        check_minimum(minimum.0, Amount::new(first_optimal))?;
        Ok((Amount::new(first_optimal), desired.1))
    }

    /// Position tokens minted for depositing `(first, second)`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidQuantity`] if the deposit is too small
    /// to mint anything.
    pub fn quote_mint(&self, first: Amount, second: Amount) -> Result<Amount, RouterError> {
        let minted = if self.total_supply.is_zero() {
            sqrt_product(first.get(), second.get())?
        } else {
            let by_first = mul_div(
                first.get(),
                self.total_supply.get(),
                self.reserve_first.get(),
                Rounding::Down,
            )?;
            let by_second = mul_div(
                second.get(),
                self.total_supply.get(),
                self.reserve_second.get(),
                Rounding::Down,
            )?;
            by_first.min(by_second)
        };
        if minted == 0 {
            return Err(RouterError::InvalidQuantity(
                "deposit too small to mint liquidity",
            ));
        }
        Ok(Amount::new(minted))
    }

    /// Books a deposit of `(first, second)` and returns the tokens minted.
    ///
    /// # Errors
    ///
    /// Everything [`quote_mint`](Self::quote_mint) returns, plus
    /// [`RouterError::Overflow`].
    pub fn deposit(&mut self, first: Amount, second: Amount) -> Result<Amount, RouterError> {
        let minted = self.quote_mint(first, second)?;
        self.reserve_first = self.reserve_first.safe_add(&first)?;
        self.reserve_second = self.reserve_second.safe_add(&second)?;
        self.total_supply = self.total_supply.safe_add(&minted)?;
        Ok(minted)
    }

    /// Pro-rata payout for burning `liquidity`, in canonical order.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidQuantity`] if `liquidity` is zero.
    /// - [`RouterError::InsufficientLiquidity`] if it exceeds the supply.
    pub fn quote_withdrawal(&self, liquidity: Amount) -> Result<(Amount, Amount), RouterError> {
        if liquidity.is_zero() {
            return Err(RouterError::InvalidQuantity("cannot remove zero liquidity"));
        }
        if liquidity > self.total_supply {
            return Err(RouterError::InsufficientLiquidity);
        }
        let total = self.total_supply.get();
        let first = mul_div(self.reserve_first.get(), liquidity.get(), total, Rounding::Down)?;
        let second = mul_div(self.reserve_second.get(), liquidity.get(), total, Rounding::Down)?;
        Ok((Amount::new(first), Amount::new(second)))
    }

    /// Books a withdrawal and returns the payout in canonical order.
    ///
    /// # Errors
    ///
    /// Everything [`quote_withdrawal`](Self::quote_withdrawal) returns.
    pub fn withdraw(&mut self, liquidity: Amount) -> Result<(Amount, Amount), RouterError> {
        let (first, second) = self.quote_withdrawal(liquidity)?;
        self.reserve_first = self.reserve_first.safe_sub(&first)?;
        self.reserve_second = self.reserve_second.safe_sub(&second)?;
        self.total_supply = self.total_supply.safe_sub(&liquidity)?;
        Ok((first, second))
    }

    /// What a flash borrower owes for `borrowed` when repaying in `repay_in`.
    /// Returns `(owed, fee)`, both in `repay_in`.
    ///
    /// - Same token: `fee = floor(amount × bps / (10 000 − bps)) + 1`, so
    ///   the pool keeps at least its swap fee on the gross repayment.
    /// - Counter token: priced as an exact-output swap at current reserves.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidToken`] if a token is not in the pair.
    /// - [`RouterError::InsufficientLiquidity`] if the loan exceeds the reserve.
    pub fn flash_repayment(
        &self,
        borrowed: TokenAmount,
        repay_in: &Token,
    ) -> Result<(Amount, Amount), RouterError> {
        let reserve = self.reserve_of(&borrowed.token())?;
        if borrowed.amount() >= reserve {
            return Err(RouterError::InsufficientLiquidity);
        }
        if *repay_in == borrowed.token() {
            let bps = u128::from(self.fee_tier.basis_points().get());
            let fee = mul_div(
                borrowed.amount().get(),
                bps,
                self.fee_complement()?,
                Rounding::Down,
            )?;
            let fee = Amount::new(fee).safe_add(&Amount::new(1))?;
            let owed = borrowed.amount().safe_add(&fee)?;
            return Ok((owed, fee));
        }
        if self.pair.other(&borrowed.token())? != *repay_in {
            return Err(RouterError::InvalidToken("repayment token not in pool pair"));
        }
        self.quote_exact_out(repay_in, borrowed.amount())
    }

    /// Overwrites the reserves with observed balances.
    pub fn sync(&mut self, reserve_first: Amount, reserve_second: Amount) {
        self.reserve_first = reserve_first;
        self.reserve_second = reserve_second;
    }

    fn fee_complement(&self) -> Result<u128, RouterError> {
        let bps = u128::from(self.fee_tier.basis_points().get());
        match BPS_DENOMINATOR.checked_sub(bps) {
            Some(c) if c > 0 => Ok(c),
            _ => Err(RouterError::InvalidConfiguration(
                "100% fee makes swap impossible",
            )),
        }
    }
}

fn check_minimum(minimum: Amount, actual: Amount) -> Result<(), RouterError> {
    if actual < minimum {
        return Err(RouterError::SlippageExceeded { minimum, actual });
    }
    Ok(())
}

impl FromConfig<PoolConfig> for ConstantProductPool {
    /// Creates a pool seeded with the configured reserves.
    ///
    /// The initial position-token supply is `floor(√(reserve_first × reserve_second))`.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`PoolConfig::validate`].
    fn from_config(config: &PoolConfig) -> Result<Self, RouterError> {
        config.validate()?;
        let first = config.reserve_first();
        let second = config.reserve_second();
        let supply = sqrt_product(first.get(), second.get())?;
        Ok(Self {
            pair: *config.pair(),
            fee_tier: config.fee_tier(),
            reserve_first: first,
            reserve_second: second,
            total_supply: Amount::new(supply),
        })
    }
}
