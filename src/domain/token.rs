//! Token identity.

use serde::{Deserialize, Serialize};

use super::{Address, Amount, Decimals, TokenAmount};

/// A fungible token: its contract [`Address`] and fixed [`Decimals`].
///
/// Two tokens are equal only when both fields match.
///
/// # Examples
///
/// ```
/// use hydra_router::domain::{Address, Decimals, Token};
///
/// let wbtc = Token::new(Address::repeat_byte(2), Decimals::new(8).expect("valid"));
/// assert_eq!(wbtc.units(500).amount().get(), 50_000_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    address: Address,
    decimals: Decimals,
}

impl Token {
    /// Creates a new `Token`.
    #[must_use]
    pub const fn new(address: Address, decimals: Decimals) -> Self {
        Self { address, decimals }
    }

    /// Returns the token address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the token decimals.
    #[must_use]
    pub const fn decimals(&self) -> Decimals {
        self.decimals
    }

    /// `whole` units of this token, scaled to raw units.
    #[must_use]
    pub const fn units(&self, whole: u64) -> TokenAmount {
        TokenAmount::new(*self, Amount::new(self.decimals.scale_up(whole)))
    }

    /// A raw magnitude of this token.
    #[must_use]
    pub const fn raw(&self, raw: u128) -> TokenAmount {
        TokenAmount::new(*self, Amount::new(raw))
    }
}
