//! All-or-nothing execution environment.
//!
//! Every top-level router operation runs inside
//! [`ExecutionEnvironment::execute_atomic`]. If the closure returns `Err`,
//! the environment discards every ledger and venue change the closure made,
//! including a flash loan's disbursement. The router itself contains no
//! compensating logic.

use super::{AmmVenue, TokenLedger};
use crate::error::Result;

/// Serialized, atomic access to the ledger and the venue.
pub trait ExecutionEnvironment {
    /// Read-only view of the ledger between operations.
    fn ledger(&self) -> &dyn TokenLedger;

    /// Read-only view of the venue between operations.
    fn venue(&self) -> &dyn AmmVenue;

    /// Runs `op` as a single unit of work.
    ///
    /// # Errors
    ///
    /// Returns whatever `op` returns; on `Err` no effect of `op` survives.
    fn execute_atomic<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut dyn TokenLedger, &mut dyn AmmVenue) -> Result<T>;
}
