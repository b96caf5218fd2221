//! Borrower callback invoked by the venue inside a flash loan.

use super::TokenLedger;
use crate::domain::FlashLoan;
use crate::error::Result;

/// Receives control while a flash loan is outstanding.
///
/// The callback sees only the ledger, never the venue, so it cannot
/// re-enter the pool it borrowed from. It must leave the owed amounts with
/// the lender before returning; the lender checks.
pub trait FlashSwapCallback {
    /// Runs with the loan disbursed to [`FlashLoan::borrower`].
    ///
    /// # Errors
    ///
    /// Any error aborts the flash swap and rolls back the disbursement.
    fn on_flash_loan(&mut self, ledger: &mut dyn TokenLedger, loan: &FlashLoan) -> Result<()>;
}

impl<F> FlashSwapCallback for F
where
    F: FnMut(&mut dyn TokenLedger, &FlashLoan) -> Result<()>,
{
    fn on_flash_loan(&mut self, ledger: &mut dyn TokenLedger, loan: &FlashLoan) -> Result<()> {
        self(ledger, loan)
    }
}
