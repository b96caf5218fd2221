//! A magnitude tagged with its token.

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding, Token};
use crate::error::{Result, RouterError};

/// A raw [`Amount`] denominated in a specific [`Token`].
///
/// Comparisons between amounts of different tokens are refused rather than
/// performed on raw magnitudes: 1 WBTC (`10^8`) is not "less" than
/// 1 DAI (`10^18`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenAmount {
    token: Token,
    amount: Amount,
}

impl TokenAmount {
    /// Creates a new `TokenAmount`.
    #[must_use]
    pub const fn new(token: Token, amount: Amount) -> Self {
        Self { token, amount }
    }

    /// Zero of `token`.
    #[must_use]
    pub const fn zero(token: Token) -> Self {
        Self::new(token, Amount::ZERO)
    }

    /// Returns the token.
    #[must_use]
    pub const fn token(&self) -> Token {
        self.token
    }

    /// Returns the raw magnitude.
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns `true` if the magnitude is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Orders two amounts of the same token.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidToken`] if the tokens differ.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering> {
        if self.token != other.token {
            return Err(RouterError::InvalidToken(
                "cannot compare amounts of different tokens",
            ));
        }
        Ok(self.amount.cmp(&other.amount))
    }

    /// Adds two amounts of the same token.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidToken`] on a token mismatch,
    /// [`RouterError::Overflow`] on overflow.
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        if self.token != other.token {
            return Err(RouterError::InvalidToken(
                "cannot add amounts of different tokens",
            ));
        }
        let sum = self
            .amount
            .checked_add(&other.amount)
            .ok_or(RouterError::Overflow("token amount addition overflow"))?;
        Ok(Self::new(self.token, sum))
    }

    /// Re-expresses this magnitude at `target`'s precision, for value
    /// comparisons across tokens with different decimals.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Overflow`] if widening overflows.
    pub fn rescale(&self, target: &Token, rounding: Rounding) -> Result<Amount> {
        self.token
            .decimals()
            .rescale(self.amount.get(), target.decimals(), rounding)
            .map(Amount::new)
            .ok_or(RouterError::Overflow("rescale overflow"))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.amount, self.token.address())
    }
}
