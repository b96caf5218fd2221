//! Canonically ordered pair of distinct tokens.

use serde::{Deserialize, Serialize};

use super::{Amount, Token};
use crate::error::RouterError;

/// Two distinct tokens, sorted by address.
///
/// Venues key pools by the canonical order, so `(A, B)` and `(B, A)` build
/// the same pair. Callers keep speaking in their own order; the router
/// translates with [`TokenPair::orient`] and [`TokenPair::sort_amounts`].
///
/// # Examples
///
/// ```
/// use hydra_router::domain::{Address, Decimals, Token, TokenPair};
///
/// let a = Token::new(Address::repeat_byte(1), Decimals::new(18).expect("valid"));
/// let b = Token::new(Address::repeat_byte(2), Decimals::new(8).expect("valid"));
///
/// let pair = TokenPair::new(b, a).expect("distinct tokens");
/// assert_eq!(pair.first(), a);
/// assert_eq!(pair.second(), b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[Token; 2]", into = "[Token; 2]")]
pub struct TokenPair {
    first: Token,
    second: Token,
}

impl TokenPair {
    /// Creates a canonically ordered `TokenPair`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::IdenticalTokens`] if both tokens share an address.
    pub fn new(token1: Token, token2: Token) -> Result<Self, RouterError> {
        if token1.address() == token2.address() {
            return Err(RouterError::IdenticalTokens);
        }
        let (first, second) = if token1.address() < token2.address() {
            (token1, token2)
        } else {
            (token2, token1)
        };
        Ok(Self { first, second })
    }

    /// Returns the token with the lower address.
    #[must_use]
    pub const fn first(&self) -> Token {
        self.first
    }

    /// Returns the token with the higher address.
    #[must_use]
    pub const fn second(&self) -> Token {
        self.second
    }

    /// Returns `true` if `token` is part of this pair.
    #[must_use]
    pub fn contains(&self, token: &Token) -> bool {
        self.first == *token || self.second == *token
    }

    /// Returns the counterpart of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidToken`] if `token` is not in the pair.
    pub fn other(&self, token: &Token) -> Result<Token, RouterError> {
        if *token == self.first {
            Ok(self.second)
        } else if *token == self.second {
            Ok(self.first)
        } else {
            Err(RouterError::InvalidToken("token is not part of this pair"))
        }
    }

    /// Returns `(token_in, token_out)` for a trade selling `token_in`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidToken`] if `token_in` is not in the pair.
    pub fn orient(&self, token_in: &Token) -> Result<(Token, Token), RouterError> {
        Ok((*token_in, self.other(token_in)?))
    }

    /// Returns `true` if `token` is the pair's first token.
    #[must_use]
    pub fn is_first(&self, token: &Token) -> bool {
        self.first == *token
    }

    /// Reorders amounts given for `(token, other)` into canonical
    /// `(first, second)` order.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidToken`] if `token` is not in the pair.
    pub fn sort_amounts(
        &self,
        token: &Token,
        amount: Amount,
        other_amount: Amount,
    ) -> Result<(Amount, Amount), RouterError> {
        if !self.contains(token) {
            return Err(RouterError::InvalidToken("token is not part of this pair"));
        }
        if self.is_first(token) {
            Ok((amount, other_amount))
        } else {
            Ok((other_amount, amount))
        }
    }
}

impl TryFrom<[Token; 2]> for TokenPair {
    type Error = RouterError;

    fn try_from(tokens: [Token; 2]) -> Result<Self, Self::Error> {
        let [a, b] = tokens;
        Self::new(a, b)
    }
}

impl From<TokenPair> for [Token; 2] {
    fn from(pair: TokenPair) -> Self {
        [pair.first, pair.second]
    }
}
