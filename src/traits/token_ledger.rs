//! Fungible-token ledger seam.
//!
//! [`TokenLedger`] is the narrow view of the external token contracts the
//! router and the venue share. All balances live behind it; the router owns
//! none.
//!
//! # Allowance Contract
//!
//! [`TokenLedger::transfer_from`] must debit the spender's allowance by the
//! exact amount moved and fail with [`RouterError::AuthorizationFailed`]
//! when the allowance is short. Allowances never auto-expire; the router
//! clears the ones it grants.
//!
//! # Issuance
//!
//! [`TokenLedger::mint`] and [`TokenLedger::burn`] succeed only for the
//! token's registered issuer. The venue uses them for position tokens.
//!
//! [`RouterError::AuthorizationFailed`]: crate::error::RouterError::AuthorizationFailed

use crate::domain::{Address, Amount, Token};
use crate::error::Result;

/// Balances, allowances and transfers for every token the router touches.
///
/// Methods take `&Token` rather than a bare address so callers keep the
/// decimals in scope; ledgers key storage by [`Token::address`].
pub trait TokenLedger {
    /// Live balance of `owner`. Unknown owners hold zero.
    #[must_use]
    fn balance_of(&self, token: &Token, owner: Address) -> Amount;

    /// Remaining amount `spender` may move out of `owner`'s balance.
    #[must_use]
    fn allowance(&self, token: &Token, owner: Address, spender: Address) -> Amount;

    /// Moves `amount` from `from` to `to`, authorized by `from` itself.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InsufficientCustodyBalance`] if `from` holds less.
    /// - [`RouterError::InvalidToken`] if the token is unknown.
    ///
    /// [`RouterError::InsufficientCustodyBalance`]: crate::error::RouterError::InsufficientCustodyBalance
    /// [`RouterError::InvalidToken`]: crate::error::RouterError::InvalidToken
    fn transfer(&mut self, token: &Token, from: Address, to: Address, amount: Amount) -> Result<()>;

    /// Sets `spender`'s allowance over `owner`'s balance to exactly `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidToken`] if the token is unknown.
    ///
    /// [`RouterError::InvalidToken`]: crate::error::RouterError::InvalidToken
    fn approve(
        &mut self,
        token: &Token,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<()>;

    /// Moves `amount` from `from` to `to` on behalf of `spender`, spending
    /// allowance.
    ///
    /// # Errors
    ///
    /// - [`RouterError::AuthorizationFailed`] if the allowance is short.
    /// - [`RouterError::InsufficientCustodyBalance`] if `from` holds less.
    ///
    /// [`RouterError::AuthorizationFailed`]: crate::error::RouterError::AuthorizationFailed
    /// [`RouterError::InsufficientCustodyBalance`]: crate::error::RouterError::InsufficientCustodyBalance
    fn transfer_from(
        &mut self,
        token: &Token,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()>;

    /// Creates `amount` new units for `to`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::AuthorizationFailed`] unless `issuer` is the
    /// token's registered issuer.
    ///
    /// [`RouterError::AuthorizationFailed`]: crate::error::RouterError::AuthorizationFailed
    fn mint(&mut self, token: &Token, issuer: Address, to: Address, amount: Amount) -> Result<()>;

    /// Destroys `amount` units held by `from`.
    ///
    /// # Errors
    ///
    /// - [`RouterError::AuthorizationFailed`] unless `issuer` is the issuer.
    /// - [`RouterError::InsufficientCustodyBalance`] if `from` holds less.
    ///
    /// [`RouterError::AuthorizationFailed`]: crate::error::RouterError::AuthorizationFailed
    /// [`RouterError::InsufficientCustodyBalance`]: crate::error::RouterError::InsufficientCustodyBalance
    fn burn(&mut self, token: &Token, issuer: Address, from: Address, amount: Amount)
        -> Result<()>;
}
