//! Snapshot-and-restore execution environment.

use tracing::warn;

use super::{ConstantProductVenue, InMemoryLedger};
use crate::config::PoolConfig;
use crate::domain::{Address, Amount, Token, TokenPair};
use crate::pools::ConstantProductPool;
use crate::error::Result;
use crate::traits::{AmmVenue, ExecutionEnvironment, TokenLedger};

/// Owns a ledger and a venue and makes every operation all-or-nothing.
///
/// [`execute_atomic`](ExecutionEnvironment::execute_atomic) clones both
/// before running the operation and puts the clones back if it fails, the
/// way a reverted transaction leaves chain state untouched.
#[derive(Debug, Clone)]
pub struct Sandbox<L = InMemoryLedger, V = ConstantProductVenue> {
    ledger: L,
    venue: V,
}

impl<L, V> Sandbox<L, V> {
    /// Wraps an existing ledger and venue.
    #[must_use]
    pub const fn new(ledger: L, venue: V) -> Self {
        Self { ledger, venue }
    }

    /// Direct mutable access to the ledger, outside any atomic scope.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Direct mutable access to the venue, outside any atomic scope.
    pub fn venue_mut(&mut self) -> &mut V {
        &mut self.venue
    }

    /// Splits the environment into its parts.
    #[must_use]
    pub fn into_parts(self) -> (L, V) {
        (self.ledger, self.venue)
    }
}

impl Sandbox {
    /// An empty ledger and a venue trading from `venue_address`.
    #[must_use]
    pub fn with_venue(venue_address: Address) -> Self {
        Self::new(InMemoryLedger::new(), ConstantProductVenue::new(venue_address))
    }

    /// Registers an externally issued token.
    ///
    /// # Errors
    ///
    /// See [`InMemoryLedger::register_token`].
    pub fn register_token(&mut self, token: Token) -> Result<()> {
        self.ledger.register_token(token, None)
    }

    /// Credits `owner` with `amount` of `token`.
    ///
    /// # Errors
    ///
    /// See [`InMemoryLedger::credit`].
    pub fn fund(&mut self, token: &Token, owner: Address, amount: Amount) -> Result<()> {
        self.ledger.credit(token, owner, amount)
    }

    /// Opens a pool on the venue and returns its position token.
    ///
    /// # Errors
    ///
    /// See [`ConstantProductVenue::open_pool`].
    pub fn open_pool(&mut self, config: &PoolConfig, liquidity_address: Address) -> Result<Token> {
        self.venue
            .open_pool(&mut self.ledger, config, liquidity_address)
    }

    /// Returns the venue's pool for `pair`, if any.
    #[must_use]
    pub fn pool(&self, pair: &TokenPair) -> Option<&ConstantProductPool> {
        self.venue.pool(pair)
    }
}

impl<L, V> ExecutionEnvironment for Sandbox<L, V>
where
    L: TokenLedger + Clone,
    V: AmmVenue + Clone,
{
    fn ledger(&self) -> &dyn TokenLedger {
        &self.ledger
    }

    fn venue(&self) -> &dyn AmmVenue {
        &self.venue
    }

    fn execute_atomic<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut dyn TokenLedger, &mut dyn AmmVenue) -> Result<T>,
    {
        let ledger_snapshot = self.ledger.clone();
        let venue_snapshot = self.venue.clone();
        match op(&mut self.ledger, &mut self.venue) {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!(%error, "operation failed, state rolled back");
                self.ledger = ledger_snapshot;
                self.venue = venue_snapshot;
                Err(error)
            }
        }
    }
}
