//! Property-based checks of the router against the sandbox.
//!
//! 1. **Floor honoured**: a floor at or below the quote succeeds and the
//!    recipient gains exactly what the venue reported.
//! 2. **Failed swap is a no-op**: a floor above the quote fails with
//!    `SlippageExceeded` and no balance moves.
//! 3. **Round-trip liquidity**: add then remove never returns more than
//!    the desired amounts.
//! 4. **Unpaid flash swap**: custody ends bit-for-bit where it started.
//! 5. **Repaid flash swap**: custody's net change is minus the fee.

use proptest::prelude::*;

use crate::config::{PoolConfig, RouterConfig};
use crate::domain::{
    Address, Amount, Decimals, FeeTier, FlashLoan, FlashSwapRequest, LiquidityRequest,
    OutputFloor, RemoveLiquidityRequest, SwapRequest, Token, TokenPair,
};
use crate::error::{Result, RouterError};
use crate::math::CheckedArithmetic;
use crate::router::Router;
use crate::sandbox::Sandbox;
use crate::traits::{ExecutionEnvironment, TokenLedger};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const CUSTODY: Address = Address::repeat_byte(0xc5);
const RECIPIENT: Address = Address::repeat_byte(0x7e);
const SINK: Address = Address::repeat_byte(0x5d);

fn dai() -> Token {
    let Ok(d) = Decimals::new(18) else {
        panic!("valid decimals");
    };
    Token::new(Address::repeat_byte(0x6b), d)
}

fn wbtc() -> Token {
    let Ok(d) = Decimals::new(8) else {
        panic!("valid decimals");
    };
    Token::new(Address::repeat_byte(0x22), d)
}

fn pair() -> TokenPair {
    let Ok(p) = TokenPair::new(dai(), wbtc()) else {
        panic!("distinct tokens");
    };
    p
}

/// Router over a DAI/WBTC pool with `dai_reserve` whole DAI and
/// `wbtc_reserve` whole WBTC; custody holds `custody_dai` and `custody_wbtc`.
fn make_router(
    dai_reserve: u64,
    wbtc_reserve: u64,
    custody_dai: u64,
    custody_wbtc: u64,
) -> Router<Sandbox> {
    let mut sandbox = Sandbox::with_venue(Address::repeat_byte(0xee));
    for (t, held) in [(dai(), custody_dai), (wbtc(), custody_wbtc)] {
        let Ok(()) = sandbox.register_token(t) else {
            panic!("register");
        };
        let Ok(()) = sandbox.fund(&t, CUSTODY, t.units(held).amount()) else {
            panic!("fund");
        };
    }
    let Ok((first, second)) = pair().sort_amounts(
        &dai(),
        dai().units(dai_reserve).amount(),
        wbtc().units(wbtc_reserve).amount(),
    ) else {
        panic!("sorted");
    };
    let Ok(pool) = PoolConfig::new(pair(), FeeTier::TIER_0_30_PERCENT, first, second) else {
        panic!("pool config");
    };
    let Ok(_) = sandbox.open_pool(&pool, Address::repeat_byte(0x1f)) else {
        panic!("pool");
    };
    let Ok(router) = Router::new(sandbox, RouterConfig::new(CUSTODY)) else {
        panic!("router");
    };
    router
}

fn snapshot(router: &Router<Sandbox>) -> [Amount; 4] {
    let ledger = router.env().ledger();
    [
        ledger.balance_of(&dai(), CUSTODY),
        ledger.balance_of(&wbtc(), CUSTODY),
        ledger.balance_of(&dai(), RECIPIENT),
        ledger.balance_of(&wbtc(), RECIPIENT),
    ]
}

/// Sends custody's whole balance of every repayment token elsewhere.
fn give_away_everything(ledger: &mut dyn TokenLedger, loan: &FlashLoan) -> Result<()> {
    for obligation in loan.obligations() {
        let token = obligation.repay_token();
        let held = ledger.balance_of(&token, loan.borrower());
        ledger.transfer(&token, loan.borrower(), SINK, held)?;
    }
    Ok(())
}

fn keep_loan(_: &mut dyn TokenLedger, _: &FlashLoan) -> Result<()> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_floor_below_quote_succeeds(
        dai_reserve in 100_000u64..=50_000_000,
        wbtc_reserve in 10u64..=2_000,
        sell in 1u64..=50_000,
        slack in 0u16..=500,
    ) {
        let mut router = make_router(dai_reserve, wbtc_reserve, 100_000, 0);
        let amount_in = dai().units(sell);
        let Ok(quote) = router.get_max_output(amount_in, wbtc()) else {
            return Ok(());
        };
        let Ok(floor) = quote.amount().safe_sub(&Amount::new(u128::from(slack)).min(quote.amount())) else {
            return Ok(());
        };
        let Ok(request) = SwapRequest::new(pair(), amount_in, OutputFloor::at_least(floor), RECIPIENT) else {
            return Ok(());
        };
        let before = snapshot(&router);
        let Ok(receipt) = router.swap_tokens(request) else {
            prop_assert!(false, "swap at floor {} below quote {} failed", floor, quote);
            return Ok(());
        };
        let after = snapshot(&router);
        prop_assert_eq!(receipt.amount_out(), quote);
        prop_assert_eq!(after[3].safe_sub(&before[3]), Ok(receipt.amount_out().amount()));
        prop_assert_eq!(before[0].safe_sub(&after[0]), Ok(amount_in.amount()));
    }

    #[test]
    fn prop_floor_above_quote_is_noop(
        dai_reserve in 100_000u64..=50_000_000,
        wbtc_reserve in 10u64..=2_000,
        sell in 1u64..=50_000,
        excess in 1u128..=1_000_000,
    ) {
        let mut router = make_router(dai_reserve, wbtc_reserve, 100_000, 0);
        let amount_in = dai().units(sell);
        let Ok(quote) = router.get_max_output(amount_in, wbtc()) else {
            return Ok(());
        };
        let Ok(floor) = quote.amount().safe_add(&Amount::new(excess)) else {
            return Ok(());
        };
        let Ok(request) = SwapRequest::new(pair(), amount_in, OutputFloor::at_least(floor), RECIPIENT) else {
            return Ok(());
        };
        let before = snapshot(&router);
        let result = router.swap_tokens(request);
        prop_assert_eq!(
            result,
            Err(RouterError::SlippageExceeded { minimum: floor, actual: quote.amount() })
        );
        prop_assert_eq!(snapshot(&router), before);
    }

    #[test]
    fn prop_add_remove_never_returns_more(
        dai_reserve in 100_000u64..=50_000_000,
        wbtc_reserve in 10u64..=2_000,
        desired_dai in 1u64..=1_000_000,
        desired_wbtc in 1u64..=500,
    ) {
        let mut router = make_router(dai_reserve, wbtc_reserve, 1_000_000, 500);
        let Ok(request) = LiquidityRequest::new(
            dai().units(desired_dai),
            wbtc().units(desired_wbtc),
            Amount::ZERO,
            Amount::ZERO,
            CUSTODY,
        ) else {
            return Ok(());
        };
        let Ok(added) = router.add_liquidity(request) else {
            return Ok(());
        };
        let Ok(removal) = RemoveLiquidityRequest::new(
            dai(),
            wbtc(),
            added.liquidity(),
            Amount::ZERO,
            Amount::ZERO,
            CUSTODY,
        ) else {
            return Ok(());
        };
        let Ok(removed) = router.remove_liquidity(removal) else {
            prop_assert!(false, "removing freshly minted liquidity failed");
            return Ok(());
        };
        prop_assert!(removed.amount_a().amount() <= request.desired_a().amount());
        prop_assert!(removed.amount_b().amount() <= request.desired_b().amount());
        prop_assert!(removed.amount_a().amount() <= added.used_a().amount());
        prop_assert!(removed.amount_b().amount() <= added.used_b().amount());
    }

    #[test]
    fn prop_unpaid_flash_swap_restores_custody(
        dai_reserve in 100_000u64..=50_000_000,
        wbtc_reserve in 10u64..=2_000,
        borrow_dai in 1u64..=50_000,
        custody_dai in 0u64..=1_000,
    ) {
        let mut router = make_router(dai_reserve, wbtc_reserve, custody_dai, 0);
        let Ok(request) = FlashSwapRequest::single(pair(), dai().units(borrow_dai)) else {
            return Ok(());
        };
        let before = snapshot(&router);
        let result = router.flash_swap(request, give_away_everything);
        prop_assert!(result.is_err());
        prop_assert_eq!(snapshot(&router), before);
        prop_assert_eq!(router.env().ledger().balance_of(&dai(), SINK), Amount::ZERO);
    }

    #[test]
    fn prop_repaid_flash_swap_costs_fee(
        dai_reserve in 100_000u64..=50_000_000,
        wbtc_reserve in 10u64..=2_000,
        borrow_dai in 1u64..=50_000,
        borrow_wbtc in 0u64..=5,
    ) {
        let mut router = make_router(dai_reserve, wbtc_reserve, 1_000, 1);
        let Ok((first, second)) = pair().sort_amounts(
            &dai(),
            dai().units(borrow_dai).amount(),
            wbtc().units(borrow_wbtc).amount(),
        ) else {
            return Ok(());
        };
        let Ok(request) = FlashSwapRequest::new(pair(), first, second) else {
            return Ok(());
        };
        let before = snapshot(&router);
        let Ok(receipt) = router.flash_swap(request, keep_loan) else {
            return Ok(());
        };
        let after = snapshot(&router);
        for obligation in receipt.obligations() {
            let index = usize::from(obligation.repay_token() == wbtc());
            prop_assert_eq!(
                before[index].safe_sub(&after[index]),
                Ok(obligation.fee())
            );
        }
    }
}
