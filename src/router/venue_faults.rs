//! Router behaviour against a venue that breaks its side of the contract.
//!
//! [`FaultyVenue`] wraps the in-memory venue and injects one [`Fault`]
//! per test. Every case checks the typed error and that the sandbox put
//! every balance back.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::config::{PoolConfig, RouterConfig};
use crate::domain::{
    Address, Amount, Decimals, FeeTier, FlashLeg, FlashLoan, FlashSwapRequest, FlashSwapState,
    LiquidityReceipt, LiquidityRequest, OutputFloor, RemoveLiquidityRequest, RepaymentObligation,
    SwapRequest, Token, TokenAmount, TokenPair, WithdrawalReceipt,
};
use crate::error::{Result, RouterError};
use crate::math::CheckedArithmetic;
use crate::router::Router;
use crate::sandbox::{ConstantProductVenue, InMemoryLedger, Sandbox};
use crate::traits::{AmmVenue, ExecutionEnvironment, FlashSwapCallback, TokenLedger};

const CUSTODY: Address = Address::repeat_byte(0xc5);
const VENUE: Address = Address::repeat_byte(0xee);
const RECIPIENT: Address = Address::repeat_byte(0x7e);
const STRANGER: Address = Address::repeat_byte(0x99);
const POSITION: Address = Address::repeat_byte(0x1f);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    None,
    /// Swap pulls one unit less than the input.
    ShortDraw,
    /// Swap pulls one unit more than the input.
    OverDraw,
    /// Swap reports one unit more than it delivered.
    OverReport,
    /// Deposit receipt claims one more position unit than was minted.
    InflatedPosition,
    /// Deposit receipt claims one unit less of token A than was drawn.
    UnderstatedDeposit,
    /// Withdrawal receipt claims one more unit of token A than was paid.
    OverstatedPayout,
    ForeignLender,
    ForeignBorrower,
    SkipCallback,
    DoubleCallback,
}

#[derive(Debug, Clone)]
struct FaultyVenue {
    inner: ConstantProductVenue,
    fault: Fault,
}

fn one() -> Amount {
    Amount::new(1)
}

impl FaultyVenue {
    fn skewed_swap(
        &self,
        ledger: &mut dyn TokenLedger,
        payer: Address,
        request: &SwapRequest,
    ) -> Result<Amount> {
        let amount_in = request.amount_in();
        let drawn = if self.fault == Fault::ShortDraw {
            amount_in.amount().safe_sub(&one())?
        } else {
            amount_in.amount().safe_add(&one())?
        };
        let out = self.inner.get_amount_out(amount_in, &request.token_out())?;
        ledger.transfer_from(&amount_in.token(), VENUE, payer, VENUE, drawn)?;
        ledger.transfer(&request.token_out(), VENUE, request.recipient(), out)?;
        Ok(out)
    }

    fn rogue_loan(
        &self,
        ledger: &mut dyn TokenLedger,
        borrower: Address,
        pair: &TokenPair,
        legs: &[FlashLeg],
        callback: &mut dyn FlashSwapCallback,
    ) -> Result<Vec<RepaymentObligation>> {
        let obligations = legs
            .iter()
            .map(|leg| {
                let owed = TokenAmount::new(leg.repay_in, leg.borrowed.amount());
                RepaymentObligation::new(leg.borrowed, owed, Amount::ZERO)
            })
            .collect::<Result<Vec<_>>>()?;
        for obligation in &obligations {
            let leg = obligation.borrowed();
            ledger.transfer(&leg.token(), VENUE, borrower, leg.amount())?;
        }
        let (lender, named_borrower) = match self.fault {
            Fault::ForeignLender => (STRANGER, borrower),
            Fault::ForeignBorrower => (VENUE, STRANGER),
            _ => (VENUE, borrower),
        };
        let loan = FlashLoan::new(lender, named_borrower, *pair, obligations.clone());
        match self.fault {
            Fault::SkipCallback => {}
            Fault::DoubleCallback => {
                callback.on_flash_loan(ledger, &loan)?;
                callback.on_flash_loan(ledger, &loan)?;
            }
            _ => callback.on_flash_loan(ledger, &loan)?,
        }
        Ok(obligations)
    }
}

impl AmmVenue for FaultyVenue {
    fn address(&self) -> Address {
        self.inner.address()
    }

    fn supports(&self, pair: &TokenPair) -> bool {
        self.inner.supports(pair)
    }

    fn liquidity_token(&self, pair: &TokenPair) -> Result<Token> {
        self.inner.liquidity_token(pair)
    }

    fn get_amount_out(&self, amount_in: TokenAmount, token_out: &Token) -> Result<Amount> {
        self.inner.get_amount_out(amount_in, token_out)
    }

    fn swap_exact_tokens_for_tokens(
        &mut self,
        ledger: &mut dyn TokenLedger,
        payer: Address,
        request: &SwapRequest,
    ) -> Result<Amount> {
        match self.fault {
            Fault::ShortDraw | Fault::OverDraw => self.skewed_swap(ledger, payer, request),
            Fault::OverReport => self
                .inner
                .swap_exact_tokens_for_tokens(ledger, payer, request)?
                .safe_add(&one()),
            _ => self.inner.swap_exact_tokens_for_tokens(ledger, payer, request),
        }
    }

    fn add_liquidity(
        &mut self,
        ledger: &mut dyn TokenLedger,
        provider: Address,
        request: &LiquidityRequest,
    ) -> Result<LiquidityReceipt> {
        let receipt = self.inner.add_liquidity(ledger, provider, request)?;
        match self.fault {
            Fault::InflatedPosition => Ok(LiquidityReceipt::new(
                receipt.used_a(),
                receipt.used_b(),
                receipt.liquidity().safe_add(&one())?,
            )),
            Fault::UnderstatedDeposit => {
                let used_a = receipt.used_a();
                Ok(LiquidityReceipt::new(
                    TokenAmount::new(used_a.token(), used_a.amount().safe_sub(&one())?),
                    receipt.used_b(),
                    receipt.liquidity(),
                ))
            }
            _ => Ok(receipt),
        }
    }

    fn remove_liquidity(
        &mut self,
        ledger: &mut dyn TokenLedger,
        provider: Address,
        request: &RemoveLiquidityRequest,
    ) -> Result<WithdrawalReceipt> {
        let receipt = self.inner.remove_liquidity(ledger, provider, request)?;
        if self.fault != Fault::OverstatedPayout {
            return Ok(receipt);
        }
        let paid_a = receipt.amount_a();
        Ok(WithdrawalReceipt::new(
            TokenAmount::new(paid_a.token(), paid_a.amount().safe_add(&one())?),
            receipt.amount_b(),
            receipt.liquidity_burned(),
        ))
    }

    fn accepted_repayment_tokens(
        &self,
        request: &FlashSwapRequest,
        borrowed: &Token,
    ) -> Result<Vec<Token>> {
        self.inner.accepted_repayment_tokens(request, borrowed)
    }

    fn flash_loan(
        &mut self,
        ledger: &mut dyn TokenLedger,
        borrower: Address,
        pair: &TokenPair,
        legs: &[FlashLeg],
        callback: &mut dyn FlashSwapCallback,
    ) -> Result<Vec<RepaymentObligation>> {
        match self.fault {
            Fault::ForeignLender
            | Fault::ForeignBorrower
            | Fault::SkipCallback
            | Fault::DoubleCallback => self.rogue_loan(ledger, borrower, pair, legs, callback),
            _ => self.inner.flash_loan(ledger, borrower, pair, legs, callback),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

type FaultyRouter = Router<Sandbox<InMemoryLedger, FaultyVenue>>;

fn token(byte: u8, decimals: u8) -> Token {
    let Ok(d) = Decimals::new(decimals) else {
        panic!("valid decimals");
    };
    Token::new(Address::repeat_byte(byte), d)
}

fn usdc() -> Token {
    token(0xa0, 6)
}

fn weth() -> Token {
    token(0xc0, 18)
}

fn pair() -> TokenPair {
    let Ok(p) = TokenPair::new(usdc(), weth()) else {
        panic!("pair");
    };
    p
}

fn router(fault: Fault) -> FaultyRouter {
    let mut ledger = InMemoryLedger::new();
    for (t, whole) in [(usdc(), 100_000), (weth(), 100)] {
        let Ok(()) = ledger.register_token(t, None) else {
            panic!("register");
        };
        let Ok(()) = ledger.credit(&t, CUSTODY, t.units(whole).amount()) else {
            panic!("credit");
        };
    }
    let Ok(config) = PoolConfig::new(
        pair(),
        FeeTier::TIER_0_30_PERCENT,
        usdc().units(3_000_000).amount(),
        weth().units(1_000).amount(),
    ) else {
        panic!("pool config");
    };
    let mut inner = ConstantProductVenue::new(VENUE);
    let Ok(_) = inner.open_pool(&mut ledger, &config, POSITION) else {
        panic!("pool");
    };
    let venue = FaultyVenue { inner, fault };
    let Ok(router) = Router::new(Sandbox::new(ledger, venue), RouterConfig::new(CUSTODY)) else {
        panic!("router");
    };
    router
}

fn position() -> Token {
    token(0x1f, 18)
}

/// Every balance a faulty call could touch.
fn balances(router: &FaultyRouter) -> Vec<Amount> {
    let ledger = router.env().ledger();
    let mut seen = Vec::new();
    for owner in [CUSTODY, VENUE, RECIPIENT, STRANGER] {
        for t in [usdc(), weth(), position()] {
            seen.push(ledger.balance_of(&t, owner));
        }
    }
    seen
}

fn swap_request() -> SwapRequest {
    let Ok(r) = SwapRequest::new(pair(), usdc().units(3_000), OutputFloor::Unbounded, RECIPIENT)
    else {
        panic!("request");
    };
    r
}

fn deposit() -> LiquidityRequest {
    let Ok(r) = LiquidityRequest::new(
        usdc().units(30_000),
        weth().units(10),
        Amount::new(1),
        Amount::new(1),
        CUSTODY,
    ) else {
        panic!("request");
    };
    r
}

fn loan() -> FlashSwapRequest {
    let Ok(r) = FlashSwapRequest::single(pair(), weth().units(1)) else {
        panic!("request");
    };
    r
}

fn hold(_: &mut dyn TokenLedger, _: &FlashLoan) -> Result<()> {
    Ok(())
}

fn explode(_: &mut dyn TokenLedger, _: &FlashLoan) -> Result<()> {
    panic!("action unwound")
}

fn assert_swap_fails(fault: Fault, expected: RouterError) {
    let mut router = router(fault);
    let before = balances(&router);
    assert_eq!(router.swap_tokens(swap_request()), Err(expected));
    assert_eq!(balances(&router), before);
    assert_eq!(
        router.env().ledger().allowance(&usdc(), CUSTODY, VENUE),
        Amount::ZERO
    );
}

fn assert_flash_fails(fault: Fault, expected: RouterError) {
    let mut router = router(fault);
    let before = balances(&router);
    assert_eq!(router.flash_swap(loan(), hold), Err(expected));
    assert_eq!(balances(&router), before);
    assert_eq!(router.flash_state(), FlashSwapState::Aborted);
}

// ---------------------------------------------------------------------------
// Swaps
// ---------------------------------------------------------------------------

#[test]
fn passthrough_venue_swaps_normally() {
    let mut router = router(Fault::None);
    assert!(router.swap_tokens(swap_request()).is_ok());
}

#[test]
fn short_draw_is_a_violation() {
    assert_swap_fails(
        Fault::ShortDraw,
        RouterError::VenueViolation("venue drew a different input amount"),
    );
}

#[test]
fn over_draw_stopped_by_exact_allowance() {
    assert_swap_fails(
        Fault::OverDraw,
        RouterError::AuthorizationFailed("allowance exceeded"),
    );
}

#[test]
fn over_reported_output_is_a_violation() {
    assert_swap_fails(
        Fault::OverReport,
        RouterError::VenueViolation("delivered output differs from the reported output"),
    );
}

// ---------------------------------------------------------------------------
// Liquidity
// ---------------------------------------------------------------------------

#[test]
fn inflated_position_receipt_rolls_back() {
    let mut router = router(Fault::InflatedPosition);
    let before = balances(&router);
    assert_eq!(
        router.add_liquidity(deposit()),
        Err(RouterError::VenueViolation(
            "minted position differs from the receipt"
        ))
    );
    assert_eq!(balances(&router), before);
}

#[test]
fn understated_deposit_rolls_back() {
    let mut router = router(Fault::UnderstatedDeposit);
    let before = balances(&router);
    assert_eq!(
        router.add_liquidity(deposit()),
        Err(RouterError::VenueViolation(
            "custody debit differs from the venue's receipt"
        ))
    );
    assert_eq!(balances(&router), before);
}

#[test]
fn overstated_payout_rolls_back() {
    let mut router = router(Fault::OverstatedPayout);
    let Ok(added) = router.add_liquidity(deposit()) else {
        panic!("deposit is honest under this fault");
    };
    assert!(!added.liquidity().is_zero());
    let before = balances(&router);
    assert_eq!(
        router.remove_all_liquidity(usdc(), weth(), Amount::ZERO, Amount::ZERO, RECIPIENT),
        Err(RouterError::VenueViolation(
            "withdrawal payout differs from the receipt"
        ))
    );
    assert_eq!(balances(&router), before);
    assert_eq!(
        router.env().ledger().allowance(&position(), CUSTODY, VENUE),
        Amount::ZERO
    );
}

// ---------------------------------------------------------------------------
// Flash swaps
// ---------------------------------------------------------------------------

#[test]
fn foreign_lender_refused() {
    assert_flash_fails(
        Fault::ForeignLender,
        RouterError::AuthorizationFailed("flash callback from an unexpected lender"),
    );
}

#[test]
fn loan_to_someone_else_refused() {
    assert_flash_fails(
        Fault::ForeignBorrower,
        RouterError::AuthorizationFailed("flash loan was not disbursed to custody"),
    );
}

#[test]
fn missing_callback_is_a_violation() {
    assert_flash_fails(
        Fault::SkipCallback,
        RouterError::VenueViolation("flash loan returned without invoking the callback"),
    );
}

#[test]
fn second_callback_is_reentrant() {
    assert_flash_fails(Fault::DoubleCallback, RouterError::ReentrantFlashSwap);
}

#[test]
fn aborted_router_recovers_once_venue_behaves() {
    let mut router = router(Fault::DoubleCallback);
    assert!(router.flash_swap(loan(), hold).is_err());
    router.env_mut().venue_mut().fault = Fault::None;
    let Ok(receipt) = router.flash_swap(loan(), hold) else {
        panic!("honest venue settles");
    };
    assert_eq!(receipt.borrowed(), vec![weth().units(1)]);
    assert_eq!(router.flash_state(), FlashSwapState::Settled);
}

#[test]
fn unwound_action_blocks_further_loans() {
    let mut router = router(Fault::None);
    let unwound = catch_unwind(AssertUnwindSafe(|| router.flash_swap(loan(), explode)));
    assert!(unwound.is_err());
    assert_eq!(router.flash_state(), FlashSwapState::Borrowed);
    assert_eq!(
        router.flash_swap(loan(), hold),
        Err(RouterError::ReentrantFlashSwap)
    );
}
