//! Outcomes of router operations.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Address, Amount, RepaymentObligation, TokenAmount};
use crate::error::{Result, RouterError};

/// Outcome of an exact-input swap.
///
/// # Invariants
///
/// - `amount_in > 0` and `amount_out > 0`.
/// - The input and output tokens differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapReceipt {
    amount_in: TokenAmount,
    amount_out: TokenAmount,
    recipient: Address,
}

impl SwapReceipt {
    /// Creates a validated receipt.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidQuantity`] if either side is zero or
    /// both sides are the same token.
    pub fn new(amount_in: TokenAmount, amount_out: TokenAmount, recipient: Address) -> Result<Self> {
        if amount_in.is_zero() {
            return Err(RouterError::InvalidQuantity("amount_in must be positive"));
        }
        if amount_out.is_zero() {
            return Err(RouterError::InvalidQuantity("amount_out must be positive"));
        }
        if amount_in.token() == amount_out.token() {
            return Err(RouterError::InvalidQuantity(
                "swap input and output must be different tokens",
            ));
        }
        Ok(Self {
            amount_in,
            amount_out,
            recipient,
        })
    }

    /// Returns what custody paid.
    #[must_use]
    pub const fn amount_in(&self) -> TokenAmount {
        self.amount_in
    }

    /// Returns what the recipient actually received.
    #[must_use]
    pub const fn amount_out(&self) -> TokenAmount {
        self.amount_out
    }

    /// Returns the recipient of the output.
    #[must_use]
    pub const fn recipient(&self) -> Address {
        self.recipient
    }
}

impl fmt::Display for SwapReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapReceipt(in={}, out={}, to={})",
            self.amount_in, self.amount_out, self.recipient
        )
    }
}

/// Outcome of a deposit, in the caller's token order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiquidityReceipt {
    used_a: TokenAmount,
    used_b: TokenAmount,
    liquidity: Amount,
}

impl LiquidityReceipt {
    /// Creates a receipt.
    #[must_use]
    pub const fn new(used_a: TokenAmount, used_b: TokenAmount, liquidity: Amount) -> Self {
        Self {
            used_a,
            used_b,
            liquidity,
        }
    }

    /// Returns how much of token A the venue took.
    #[must_use]
    pub const fn used_a(&self) -> TokenAmount {
        self.used_a
    }

    /// Returns how much of token B the venue took.
    #[must_use]
    pub const fn used_b(&self) -> TokenAmount {
        self.used_b
    }

    /// Returns the position tokens minted.
    #[must_use]
    pub const fn liquidity(&self) -> Amount {
        self.liquidity
    }
}

impl fmt::Display for LiquidityReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LiquidityReceipt(a={}, b={}, liquidity={})",
            self.used_a, self.used_b, self.liquidity
        )
    }
}

/// Outcome of a withdrawal, in the caller's token order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    amount_a: TokenAmount,
    amount_b: TokenAmount,
    liquidity_burned: Amount,
}

impl WithdrawalReceipt {
    /// Creates a receipt.
    #[must_use]
    pub const fn new(amount_a: TokenAmount, amount_b: TokenAmount, liquidity_burned: Amount) -> Self {
        Self {
            amount_a,
            amount_b,
            liquidity_burned,
        }
    }

    /// Returns token A paid out.
    #[must_use]
    pub const fn amount_a(&self) -> TokenAmount {
        self.amount_a
    }

    /// Returns token B paid out.
    #[must_use]
    pub const fn amount_b(&self) -> TokenAmount {
        self.amount_b
    }

    /// Returns the position tokens burned.
    #[must_use]
    pub const fn liquidity_burned(&self) -> Amount {
        self.liquidity_burned
    }
}

impl fmt::Display for WithdrawalReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WithdrawalReceipt(a={}, b={}, burned={})",
            self.amount_a, self.amount_b, self.liquidity_burned
        )
    }
}

/// Outcome of a settled flash swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashSwapReceipt {
    obligations: Vec<RepaymentObligation>,
}

impl FlashSwapReceipt {
    /// Creates a receipt from the discharged obligations.
    #[must_use]
    pub const fn new(obligations: Vec<RepaymentObligation>) -> Self {
        Self { obligations }
    }

    /// Returns the discharged obligations in canonical pair order.
    #[must_use]
    pub fn obligations(&self) -> &[RepaymentObligation] {
        &self.obligations
    }

    /// Returns what was borrowed.
    #[must_use]
    pub fn borrowed(&self) -> Vec<TokenAmount> {
        self.obligations.iter().map(RepaymentObligation::borrowed).collect()
    }

    /// Returns what was repaid.
    #[must_use]
    pub fn repaid(&self) -> Vec<TokenAmount> {
        self.obligations.iter().map(RepaymentObligation::owed).collect()
    }
}
