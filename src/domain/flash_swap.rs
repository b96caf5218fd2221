//! Flash-swap request, repayment obligations and the orchestrator state machine.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Address, Amount, Token, TokenAmount, TokenPair};
use crate::error::{Result, RouterError};

/// Which token a borrowed leg should be repaid in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentToken {
    /// Repay the borrowed token itself, principal plus fee.
    #[default]
    Borrowed,
    /// Repay the other token of the pair, priced on the pool curve.
    Counter,
}

impl RepaymentToken {
    /// Resolves the concrete token to repay `borrowed` with.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidToken`] if `borrowed` is not in `pair`.
    pub fn resolve(&self, pair: &TokenPair, borrowed: &Token) -> Result<Token> {
        match self {
            Self::Borrowed if pair.contains(borrowed) => Ok(*borrowed),
            Self::Borrowed => Err(RouterError::InvalidToken("token is not part of this pair")),
            Self::Counter => pair.other(borrowed),
        }
    }
}

/// An uncollateralized loan of one or both tokens of a pair.
///
/// Amounts are in canonical pair order. An optional per-token repayment
/// hint caps what the caller is willing to owe.
///
/// # Examples
///
/// ```
/// use hydra_router::domain::{Address, Amount, Decimals, FlashSwapRequest, Token, TokenPair};
///
/// let dai = Token::new(Address::repeat_byte(0x6b), Decimals::new(18).expect("valid"));
/// let weth = Token::new(Address::repeat_byte(0xc0), Decimals::new(18).expect("valid"));
/// let pair = TokenPair::new(dai, weth).expect("distinct");
///
/// let req = FlashSwapRequest::single(pair, dai.units(500)).expect("non-empty");
/// assert_eq!(req.loans().len(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FlashSwapFields")]
pub struct FlashSwapRequest {
    pair: TokenPair,
    amount_first: Amount,
    amount_second: Amount,
    hint_first: Option<Amount>,
    hint_second: Option<Amount>,
}

#[derive(Deserialize)]
struct FlashSwapFields {
    pair: TokenPair,
    amount_first: Amount,
    amount_second: Amount,
    #[serde(default)]
    hint_first: Option<Amount>,
    #[serde(default)]
    hint_second: Option<Amount>,
}

impl TryFrom<FlashSwapFields> for FlashSwapRequest {
    type Error = RouterError;

    fn try_from(f: FlashSwapFields) -> Result<Self> {
        let request = Self::new(f.pair, f.amount_first, f.amount_second)?;
        Ok(Self {
            hint_first: f.hint_first,
            hint_second: f.hint_second,
            ..request
        })
    }
}

impl FlashSwapRequest {
    /// Creates a request borrowing `amount_first` of `pair.first()` and
    /// `amount_second` of `pair.second()`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::EmptyFlashSwap`] if both amounts are zero.
    pub const fn new(pair: TokenPair, amount_first: Amount, amount_second: Amount) -> Result<Self> {
        if amount_first.is_zero() && amount_second.is_zero() {
            return Err(RouterError::EmptyFlashSwap);
        }
        Ok(Self {
            pair,
            amount_first,
            amount_second,
            hint_first: None,
            hint_second: None,
        })
    }

    /// Creates a single-sided request.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidToken`] if the loan token is not in `pair`.
    /// - [`RouterError::EmptyFlashSwap`] if the amount is zero.
    pub fn single(pair: TokenPair, loan: TokenAmount) -> Result<Self> {
        let (first, second) = pair.sort_amounts(&loan.token(), loan.amount(), Amount::ZERO)?;
        Self::new(pair, first, second)
    }

    /// Caps the amount the caller is willing to repay in `hint.token()`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidToken`] if the hint token is not in the pair.
    pub fn with_repayment_hint(mut self, hint: TokenAmount) -> Result<Self> {
        if !self.pair.contains(&hint.token()) {
            return Err(RouterError::InvalidToken("hint token is not part of this pair"));
        }
        if self.pair.is_first(&hint.token()) {
            self.hint_first = Some(hint.amount());
        } else {
            self.hint_second = Some(hint.amount());
        }
        Ok(self)
    }

    /// Returns the pair borrowed from.
    #[must_use]
    pub const fn pair(&self) -> &TokenPair {
        &self.pair
    }

    /// Returns the loan of `pair.first()`.
    #[must_use]
    pub const fn amount_first(&self) -> Amount {
        self.amount_first
    }

    /// Returns the loan of `pair.second()`.
    #[must_use]
    pub const fn amount_second(&self) -> Amount {
        self.amount_second
    }

    /// Returns `true` if both tokens are borrowed.
    #[must_use]
    pub const fn is_two_sided(&self) -> bool {
        !self.amount_first.is_zero() && !self.amount_second.is_zero()
    }

    /// Returns the non-zero loan legs in canonical order.
    #[must_use]
    pub fn loans(&self) -> Vec<TokenAmount> {
        [
            TokenAmount::new(self.pair.first(), self.amount_first),
            TokenAmount::new(self.pair.second(), self.amount_second),
        ]
        .into_iter()
        .filter(|leg| !leg.is_zero())
        .collect()
    }

    /// Returns the caller's cap for repayments in `token`, if any.
    #[must_use]
    pub fn hint_for(&self, token: &Token) -> Option<Amount> {
        if *token == self.pair.first() {
            self.hint_first
        } else if *token == self.pair.second() {
            self.hint_second
        } else {
            None
        }
    }
}

/// One borrowed leg together with the token the router repays it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlashLeg {
    /// Token and amount disbursed.
    pub borrowed: TokenAmount,
    /// Token the leg is repaid in.
    pub repay_in: Token,
}

/// What the borrower owes for one disbursed leg.
///
/// Created by the venue at disbursement and closed only by the repayment
/// transfer inside the same flash swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ObligationFields")]
pub struct RepaymentObligation {
    borrowed: TokenAmount,
    owed: TokenAmount,
    fee: Amount,
}

#[derive(Deserialize)]
struct ObligationFields {
    borrowed: TokenAmount,
    owed: TokenAmount,
    fee: Amount,
}

impl TryFrom<ObligationFields> for RepaymentObligation {
    type Error = RouterError;

    fn try_from(f: ObligationFields) -> Result<Self> {
        Self::new(f.borrowed, f.owed, f.fee)
    }
}

impl RepaymentObligation {
    /// Creates an obligation.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidQuantity`] if the fee exceeds the owed
    /// amount, or if a same-token obligation owes less than the principal.
    pub fn new(borrowed: TokenAmount, owed: TokenAmount, fee: Amount) -> Result<Self> {
        if fee.get() > owed.amount().get() {
            return Err(RouterError::InvalidQuantity("fee exceeds the owed amount"));
        }
        if borrowed.token() == owed.token() && owed.amount().get() < borrowed.amount().get() {
            return Err(RouterError::InvalidQuantity(
                "repayment must cover the borrowed principal",
            ));
        }
        Ok(Self {
            borrowed,
            owed,
            fee,
        })
    }

    /// Returns the disbursed leg.
    #[must_use]
    pub const fn borrowed(&self) -> TokenAmount {
        self.borrowed
    }

    /// Returns the token and amount that must be repaid.
    #[must_use]
    pub const fn owed(&self) -> TokenAmount {
        self.owed
    }

    /// Returns the fee part of [`owed`](Self::owed), in the repayment token.
    #[must_use]
    pub const fn fee(&self) -> Amount {
        self.fee
    }

    /// Returns the token repaid.
    #[must_use]
    pub const fn repay_token(&self) -> Token {
        self.owed.token()
    }
}

impl fmt::Display for RepaymentObligation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "borrowed {}, owes {} (fee {})",
            self.borrowed, self.owed, self.fee
        )
    }
}

/// Context handed to the borrower's callback while a loan is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashLoan {
    lender: Address,
    borrower: Address,
    pair: TokenPair,
    obligations: Vec<RepaymentObligation>,
}

impl FlashLoan {
    /// Creates the loan context.
    #[must_use]
    pub fn new(
        lender: Address,
        borrower: Address,
        pair: TokenPair,
        obligations: Vec<RepaymentObligation>,
    ) -> Self {
        Self {
            lender,
            borrower,
            pair,
            obligations,
        }
    }

    /// Returns the venue that disbursed the loan.
    #[must_use]
    pub const fn lender(&self) -> Address {
        self.lender
    }

    /// Returns the account the loan was disbursed to.
    #[must_use]
    pub const fn borrower(&self) -> Address {
        self.borrower
    }

    /// Returns the pair borrowed from.
    #[must_use]
    pub const fn pair(&self) -> &TokenPair {
        &self.pair
    }

    /// Returns the open obligations.
    #[must_use]
    pub fn obligations(&self) -> &[RepaymentObligation] {
        &self.obligations
    }

    /// Total owed in `token` across all obligations.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Overflow`] if the sum does not fit.
    pub fn owed_in(&self, token: &Token) -> Result<Amount> {
        self.obligations
            .iter()
            .filter(|o| o.repay_token() == *token)
            .try_fold(Amount::ZERO, |acc, o| {
                acc.checked_add(&o.owed().amount())
                    .ok_or(RouterError::Overflow("flash repayment total overflow"))
            })
    }
}

/// Lifecycle of the flash-swap orchestrator.
///
/// ```text
/// Idle ──▶ Borrowed ──▶ Settled ──┐
///   │          └──────▶ Aborted ──┤
///   └─────────────────▶ Aborted   │
///   ▲─────────────────────────────┘ (next flash swap)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FlashSwapState {
    /// No obligation outstanding.
    #[default]
    Idle,
    /// Loan disbursed, obligation open.
    Borrowed,
    /// Repayment transferred, obligation closed.
    Settled,
    /// The flash swap failed; its effects are rolled back.
    Aborted,
}

impl FlashSwapState {
    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidStateTransition`] for an edge not in the
    /// diagram above.
    pub const fn transition(self, next: Self) -> Result<Self> {
        match (self, next) {
            (Self::Idle, Self::Borrowed)
            | (Self::Idle | Self::Borrowed, Self::Aborted)
            | (Self::Borrowed, Self::Settled)
            | (Self::Settled | Self::Aborted, Self::Idle) => Ok(next),
            _ => Err(RouterError::InvalidStateTransition {
                from: self,
                to: next,
            }),
        }
    }

    /// Returns `true` while a loan is outstanding.
    #[must_use]
    pub const fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed)
    }

    /// Returns `true` for `Settled` and `Aborted`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Aborted)
    }
}

impl fmt::Display for FlashSwapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Borrowed => write!(f, "Borrowed"),
            Self::Settled => write!(f, "Settled"),
            Self::Aborted => write!(f, "Aborted"),
        }
    }
}
