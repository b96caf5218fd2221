//! Flash-swap orchestrator.
//!
//! The venue disburses the loan to custody and re-enters the router
//! through [`Settlement`], a [`FlashSwapCallback`] that runs the caller's
//! action and then pays every obligation out of live custody balances.
//!
//! ```text
//! flash_swap ─▶ venue.flash_loan ─▶ disburse ─▶ Settlement::on_flash_loan
//!                                                  ├─ check lender, borrower
//!                                                  ├─ Idle ──▶ Borrowed
//!                                                  ├─ check repayment hints
//!                                                  ├─ caller action
//!                                                  └─ repay from live balances
//!                    venue verifies repayment ◀────┘
//! Borrowed ──▶ Settled on success, anything else ──▶ Aborted
//! ```
//!
//! Undoing the disbursement after a failure is left to
//! [`ExecutionEnvironment::execute_atomic`].

use tracing::{debug, info, warn};

use super::Router;
use crate::domain::{
    Address, FlashLeg, FlashLoan, FlashSwapReceipt, FlashSwapRequest, FlashSwapState, Token,
};
use crate::error::{Result, RouterError};
use crate::traits::{ExecutionEnvironment, FlashSwapCallback, TokenLedger};

impl<E: ExecutionEnvironment> Router<E> {
    /// Borrows the requested amounts into custody, runs `action` while the
    /// loan is outstanding, and repays principal plus fee before returning.
    ///
    /// `action` receives the ledger and the loan terms; it never sees the
    /// venue or the router. Whatever it does, custody must hold every owed
    /// amount when it returns.
    ///
    /// # Errors
    ///
    /// - [`RouterError::ReentrantFlashSwap`] if a loan is already open: the
    ///   venue called back twice, or an earlier action unwound out of the
    ///   callback and left the state `Borrowed`.
    /// - [`RouterError::UnsupportedPair`] if the venue has no pool.
    /// - [`RouterError::InvalidConfiguration`] if the venue does not accept
    ///   the configured repayment token.
    /// - [`RouterError::RepaymentExceedsHint`] if an obligation exceeds the
    ///   caller's hint. The action does not run.
    /// - [`RouterError::FlashSwapUnpaid`] if custody cannot repay.
    /// - Any error `action` returns.
    ///
    /// On every error the ledger and the venue are left as they were before
    /// the call, and the state becomes [`FlashSwapState::Aborted`].
    pub fn flash_swap<A>(&mut self, request: FlashSwapRequest, action: A) -> Result<FlashSwapReceipt>
    where
        A: FnOnce(&mut dyn TokenLedger, &FlashLoan) -> Result<()>,
    {
        if self.flash_state.is_borrowed() {
            return Err(RouterError::ReentrantFlashSwap);
        }
        if self.flash_state.is_terminal() {
            self.flash_state = self.flash_state.transition(FlashSwapState::Idle)?;
        }
        let custody = self.config.custody;
        let preference = self.config.repayment;
        let state = &mut self.flash_state;

        let outcome = self.env.execute_atomic(|ledger, venue| {
            let pair = *request.pair();
            if !venue.supports(&pair) {
                return Err(RouterError::UnsupportedPair);
            }
            let mut legs = Vec::with_capacity(2);
            for borrowed in request.loans() {
                let accepted = venue.accepted_repayment_tokens(&request, &borrowed.token())?;
                let repay_in = preference.resolve(&pair, &borrowed.token())?;
                if !accepted.contains(&repay_in) {
                    return Err(RouterError::InvalidConfiguration(
                        "venue does not accept the configured repayment token",
                    ));
                }
                legs.push(FlashLeg { borrowed, repay_in });
            }

            let mut settlement = Settlement {
                state,
                custody,
                lender: venue.address(),
                request: &request,
                action: Some(action),
            };
            let obligations = venue.flash_loan(ledger, custody, &pair, &legs, &mut settlement)?;
            if !settlement.state.is_borrowed() {
                return Err(RouterError::VenueViolation(
                    "flash loan returned without invoking the callback",
                ));
            }
            Ok(obligations)
        });

        match outcome {
            Ok(obligations) => {
                self.flash_state = self.flash_state.transition(FlashSwapState::Settled)?;
                let receipt = FlashSwapReceipt::new(obligations);
                for obligation in receipt.obligations() {
                    info!(%obligation, "flash swap settled");
                }
                Ok(receipt)
            }
            Err(error) => {
                self.flash_state = self
                    .flash_state
                    .transition(FlashSwapState::Aborted)
                    .unwrap_or(FlashSwapState::Aborted);
                warn!(%error, "flash swap aborted");
                Err(error)
            }
        }
    }
}

/// The router's side of a flash loan.
struct Settlement<'a, A> {
    state: &'a mut FlashSwapState,
    custody: Address,
    lender: Address,
    request: &'a FlashSwapRequest,
    action: Option<A>,
}

impl<A> Settlement<'_, A> {
    fn check_identity(&self, loan: &FlashLoan) -> Result<()> {
        if loan.lender() != self.lender {
            return Err(RouterError::AuthorizationFailed(
                "flash callback from an unexpected lender",
            ));
        }
        if loan.borrower() != self.custody {
            return Err(RouterError::AuthorizationFailed(
                "flash loan was not disbursed to custody",
            ));
        }
        if loan.pair() != self.request.pair() {
            return Err(RouterError::AuthorizationFailed(
                "flash callback for a different pair",
            ));
        }
        Ok(())
    }

    fn check_hints(&self, loan: &FlashLoan) -> Result<()> {
        for token in repayment_tokens(loan) {
            if let Some(hint) = self.request.hint_for(&token) {
                let owed = loan.owed_in(&token)?;
                if owed > hint {
                    return Err(RouterError::RepaymentExceedsHint {
                        token: token.address(),
                        hint,
                        owed,
                    });
                }
            }
        }
        Ok(())
    }
}

impl<A> FlashSwapCallback for Settlement<'_, A>
where
    A: FnOnce(&mut dyn TokenLedger, &FlashLoan) -> Result<()>,
{
    fn on_flash_loan(&mut self, ledger: &mut dyn TokenLedger, loan: &FlashLoan) -> Result<()> {
        self.check_identity(loan)?;
        if self.state.is_borrowed() {
            return Err(RouterError::ReentrantFlashSwap);
        }
        *self.state = self.state.transition(FlashSwapState::Borrowed)?;
        self.check_hints(loan)?;

        let action = self.action.take().ok_or(RouterError::ReentrantFlashSwap)?;
        action(ledger, loan)?;

        // balances may have moved during the action; read them again
        for token in repayment_tokens(loan) {
            let owed = loan.owed_in(&token)?;
            let available = ledger.balance_of(&token, self.custody);
            if available < owed {
                return Err(RouterError::FlashSwapUnpaid {
                    token: token.address(),
                    owed,
                    available,
                });
            }
            ledger.transfer(&token, self.custody, loan.lender(), owed)?;
            debug!(token = %token.address(), %owed, "flash repayment sent");
        }
        Ok(())
    }
}

/// Distinct repayment tokens of `loan`, in obligation order.
fn repayment_tokens(loan: &FlashLoan) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::with_capacity(2);
    for obligation in loan.obligations() {
        let token = obligation.repay_token();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}
