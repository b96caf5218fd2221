//! Requests to add or remove liquidity.

use serde::{Deserialize, Serialize};

use super::{Address, Amount, Token, TokenAmount, TokenPair};
use crate::error::{Result, RouterError};

/// Deposit of two tokens into a pool in exchange for position tokens.
///
/// Amounts are kept in the caller's order (`a`, `b`). The venue picks the
/// ratio-preserving amounts actually used and rejects ones below the
/// minimums; the router passes the minimums through untouched.
///
/// # Examples
///
/// ```
/// use hydra_router::domain::{Address, Amount, Decimals, LiquidityRequest, Token};
///
/// let dai = Token::new(Address::repeat_byte(0x6b), Decimals::new(18).expect("valid"));
/// let wbtc = Token::new(Address::repeat_byte(0x22), Decimals::new(8).expect("valid"));
///
/// let req = LiquidityRequest::new(
///     dai.units(1_000),
///     wbtc.units(1),
///     Amount::new(1),
///     Amount::new(1),
///     Address::repeat_byte(0xee),
/// );
/// assert!(req.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LiquidityRequestFields")]
pub struct LiquidityRequest {
    desired_a: TokenAmount,
    desired_b: TokenAmount,
    min_a: Amount,
    min_b: Amount,
    recipient: Address,
}

#[derive(Deserialize)]
struct LiquidityRequestFields {
    desired_a: TokenAmount,
    desired_b: TokenAmount,
    min_a: Amount,
    min_b: Amount,
    recipient: Address,
}

impl TryFrom<LiquidityRequestFields> for LiquidityRequest {
    type Error = RouterError;

    fn try_from(f: LiquidityRequestFields) -> Result<Self> {
        Self::new(f.desired_a, f.desired_b, f.min_a, f.min_b, f.recipient)
    }
}

impl LiquidityRequest {
    /// Creates a deposit request.
    ///
    /// # Errors
    ///
    /// - [`RouterError::IdenticalTokens`] if both sides are the same token.
    /// - [`RouterError::InvalidQuantity`] if a desired amount is zero, a
    ///   minimum exceeds its desired amount, or `recipient` is zero.
    pub fn new(
        desired_a: TokenAmount,
        desired_b: TokenAmount,
        min_a: Amount,
        min_b: Amount,
        recipient: Address,
    ) -> Result<Self> {
        if desired_a.token().address() == desired_b.token().address() {
            return Err(RouterError::IdenticalTokens);
        }
        if desired_a.is_zero() || desired_b.is_zero() {
            return Err(RouterError::InvalidQuantity(
                "desired deposit amounts must be positive",
            ));
        }
        if min_a.get() > desired_a.amount().get() || min_b.get() > desired_b.amount().get() {
            return Err(RouterError::InvalidQuantity(
                "minimum deposit exceeds desired amount",
            ));
        }
        if recipient.is_zero() {
            return Err(RouterError::InvalidQuantity(
                "liquidity recipient must not be the zero address",
            ));
        }
        Ok(Self {
            desired_a,
            desired_b,
            min_a,
            min_b,
            recipient,
        })
    }

    /// Returns the canonical pair of the two deposited tokens.
    ///
    /// # Errors
    ///
    /// Never fails for a request built through [`LiquidityRequest::new`].
    pub fn pair(&self) -> Result<TokenPair> {
        TokenPair::new(self.desired_a.token(), self.desired_b.token())
    }

    /// Returns the desired amount of token A.
    #[must_use]
    pub const fn desired_a(&self) -> TokenAmount {
        self.desired_a
    }

    /// Returns the desired amount of token B.
    #[must_use]
    pub const fn desired_b(&self) -> TokenAmount {
        self.desired_b
    }

    /// Returns the minimum of token A.
    #[must_use]
    pub const fn min_a(&self) -> Amount {
        self.min_a
    }

    /// Returns the minimum of token B.
    #[must_use]
    pub const fn min_b(&self) -> Amount {
        self.min_b
    }

    /// Returns who receives the position tokens.
    #[must_use]
    pub const fn recipient(&self) -> Address {
        self.recipient
    }
}

/// Burn of position tokens in exchange for the two underlying tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RemoveLiquidityFields")]
pub struct RemoveLiquidityRequest {
    token_a: Token,
    token_b: Token,
    liquidity: Amount,
    min_a: Amount,
    min_b: Amount,
    recipient: Address,
}

#[derive(Deserialize)]
struct RemoveLiquidityFields {
    token_a: Token,
    token_b: Token,
    liquidity: Amount,
    min_a: Amount,
    min_b: Amount,
    recipient: Address,
}

impl TryFrom<RemoveLiquidityFields> for RemoveLiquidityRequest {
    type Error = RouterError;

    fn try_from(f: RemoveLiquidityFields) -> Result<Self> {
        Self::new(f.token_a, f.token_b, f.liquidity, f.min_a, f.min_b, f.recipient)
    }
}

impl RemoveLiquidityRequest {
    /// Creates a withdrawal request; minimums follow the `(token_a, token_b)` order.
    ///
    /// # Errors
    ///
    /// - [`RouterError::IdenticalTokens`] if `token_a == token_b`.
    /// - [`RouterError::InvalidQuantity`] if `liquidity` is zero or
    ///   `recipient` is the zero address.
    pub fn new(
        token_a: Token,
        token_b: Token,
        liquidity: Amount,
        min_a: Amount,
        min_b: Amount,
        recipient: Address,
    ) -> Result<Self> {
        if token_a.address() == token_b.address() {
            return Err(RouterError::IdenticalTokens);
        }
        if liquidity.is_zero() {
            return Err(RouterError::InvalidQuantity(
                "liquidity to remove must be positive",
            ));
        }
        if recipient.is_zero() {
            return Err(RouterError::InvalidQuantity(
                "withdrawal recipient must not be the zero address",
            ));
        }
        Ok(Self {
            token_a,
            token_b,
            liquidity,
            min_a,
            min_b,
            recipient,
        })
    }

    /// Returns the canonical pair.
    ///
    /// # Errors
    ///
    /// Never fails for a request built through [`RemoveLiquidityRequest::new`].
    pub fn pair(&self) -> Result<TokenPair> {
        TokenPair::new(self.token_a, self.token_b)
    }

    /// Returns token A in the caller's order.
    #[must_use]
    pub const fn token_a(&self) -> Token {
        self.token_a
    }

    /// Returns token B in the caller's order.
    #[must_use]
    pub const fn token_b(&self) -> Token {
        self.token_b
    }

    /// Returns the position tokens to burn.
    #[must_use]
    pub const fn liquidity(&self) -> Amount {
        self.liquidity
    }

    /// Returns the minimum of token A.
    #[must_use]
    pub const fn min_a(&self) -> Amount {
        self.min_a
    }

    /// Returns the minimum of token B.
    #[must_use]
    pub const fn min_b(&self) -> Amount {
        self.min_b
    }

    /// Returns who receives the underlying tokens.
    #[must_use]
    pub const fn recipient(&self) -> Address {
        self.recipient
    }
}
