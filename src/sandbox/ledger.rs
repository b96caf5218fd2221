//! In-memory token ledger.

use std::collections::HashMap;

use tracing::trace;

use crate::domain::{Address, Amount, Token};
use crate::error::{Result, RouterError};
use crate::math::CheckedArithmetic;
use crate::traits::TokenLedger;

#[derive(Debug, Clone)]
struct TokenBook {
    token: Token,
    issuer: Option<Address>,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
}

impl TokenBook {
    fn new(token: Token, issuer: Option<Address>) -> Self {
        Self {
            token,
            issuer,
            total_supply: Amount::ZERO,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    fn balance(&self, owner: Address) -> Amount {
        self.balances.get(&owner).copied().unwrap_or(Amount::ZERO)
    }

    fn debit(&mut self, owner: Address, amount: Amount) -> Result<()> {
        let available = self.balance(owner);
        let remaining =
            available
                .checked_sub(&amount)
                .ok_or(RouterError::InsufficientCustodyBalance {
                    token: self.token.address(),
                    required: amount,
                    available,
                })?;
        self.balances.insert(owner, remaining);
        Ok(())
    }

    fn credit(&mut self, owner: Address, amount: Amount) -> Result<()> {
        let updated = self.balance(owner).safe_add(&amount)?;
        self.balances.insert(owner, updated);
        Ok(())
    }

    fn check_issuer(&self, issuer: Address) -> Result<()> {
        if self.issuer != Some(issuer) {
            return Err(RouterError::AuthorizationFailed(
                "only the token issuer may mint or burn",
            ));
        }
        Ok(())
    }
}

/// Balances and allowances for a set of registered tokens, held in memory.
///
/// Cloning is cheap enough for the sandbox environment to snapshot the
/// whole ledger before each operation.
///
/// # Examples
///
/// ```
/// use hydra_router::domain::{Address, Amount, Decimals, Token};
/// use hydra_router::sandbox::InMemoryLedger;
/// use hydra_router::traits::TokenLedger;
///
/// let dai = Token::new(Address::repeat_byte(0x6b), Decimals::new(18).expect("valid"));
/// let whale = Address::repeat_byte(0xf9);
///
/// let mut ledger = InMemoryLedger::new();
/// ledger.register_token(dai, None).expect("new token");
/// ledger.credit(&dai, whale, Amount::new(10)).expect("credited");
/// assert_eq!(ledger.balance_of(&dai, whale), Amount::new(10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    books: HashMap<Address, TokenBook>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token`. Only `issuer` may later mint or burn it.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidToken`] if the address is taken.
    pub fn register_token(&mut self, token: Token, issuer: Option<Address>) -> Result<()> {
        if self.books.contains_key(&token.address()) {
            return Err(RouterError::InvalidToken("token already registered"));
        }
        self.books
            .insert(token.address(), TokenBook::new(token, issuer));
        Ok(())
    }

    /// Returns `true` if `token` is registered.
    #[must_use]
    pub fn is_registered(&self, token: &Token) -> bool {
        self.books.contains_key(&token.address())
    }

    /// Creates `amount` out of thin air for `owner`, like a funded account
    /// on a forked chain.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidToken`] if the token is unknown.
    /// - [`RouterError::Overflow`] if the balance would overflow.
    pub fn credit(&mut self, token: &Token, owner: Address, amount: Amount) -> Result<()> {
        let book = self.book_mut(token)?;
        book.credit(owner, amount)?;
        book.total_supply = book.total_supply.safe_add(&amount)?;
        Ok(())
    }

    /// Returns the circulating supply of `token`.
    #[must_use]
    pub fn total_supply(&self, token: &Token) -> Amount {
        self.books
            .get(&token.address())
            .map_or(Amount::ZERO, |b| b.total_supply)
    }

    fn book_mut(&mut self, token: &Token) -> Result<&mut TokenBook> {
        self.books
            .get_mut(&token.address())
            .ok_or(RouterError::InvalidToken("token is not registered"))
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, token: &Token, owner: Address) -> Amount {
        self.books
            .get(&token.address())
            .map_or(Amount::ZERO, |b| b.balance(owner))
    }

    fn allowance(&self, token: &Token, owner: Address, spender: Address) -> Amount {
        self.books
            .get(&token.address())
            .and_then(|b| b.allowances.get(&(owner, spender)).copied())
            .unwrap_or(Amount::ZERO)
    }

    fn transfer(&mut self, token: &Token, from: Address, to: Address, amount: Amount) -> Result<()> {
        let book = self.book_mut(token)?;
        book.debit(from, amount)?;
        book.credit(to, amount)?;
        trace!(token = %token.address(), %from, %to, %amount, "transfer");
        Ok(())
    }

    fn approve(
        &mut self,
        token: &Token,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<()> {
        let book = self.book_mut(token)?;
        if amount.is_zero() {
            book.allowances.remove(&(owner, spender));
        } else {
            book.allowances.insert((owner, spender), amount);
        }
        trace!(token = %token.address(), %owner, %spender, %amount, "approve");
        Ok(())
    }

    fn transfer_from(
        &mut self,
        token: &Token,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        let book = self.book_mut(token)?;
        let allowed = book
            .allowances
            .get(&(from, spender))
            .copied()
            .unwrap_or(Amount::ZERO);
        let remaining = allowed
            .checked_sub(&amount)
            .ok_or(RouterError::AuthorizationFailed("allowance exceeded"))?;
        book.debit(from, amount)?;
        book.credit(to, amount)?;
        if remaining.is_zero() {
            book.allowances.remove(&(from, spender));
        } else {
            book.allowances.insert((from, spender), remaining);
        }
        trace!(token = %token.address(), %spender, %from, %to, %amount, "transfer_from");
        Ok(())
    }

    fn mint(&mut self, token: &Token, issuer: Address, to: Address, amount: Amount) -> Result<()> {
        let book = self.book_mut(token)?;
        book.check_issuer(issuer)?;
        book.credit(to, amount)?;
        book.total_supply = book.total_supply.safe_add(&amount)?;
        Ok(())
    }

    fn burn(&mut self, token: &Token, issuer: Address, from: Address, amount: Amount) -> Result<()> {
        let book = self.book_mut(token)?;
        book.check_issuer(issuer)?;
        book.debit(from, amount)?;
        book.total_supply = book.total_supply.safe_sub(&amount)?;
        Ok(())
    }
}
