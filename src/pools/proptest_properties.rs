//! Property-based checks of the constant-product curve.
//!
//! 1. **Swap reversibility**: A→B→A returns at most the original input.
//! 2. **Invariant preservation**: `k` never shrinks across swaps.
//! 3. **Output monotonicity**: a larger input never yields a smaller output.
//! 4. **Liquidity conservation**: deposit then withdraw returns at most the deposit.
//! 5. **Flash fee floor**: same-token repayment always exceeds the principal.

use alloy_primitives::U256;
use proptest::prelude::*;

use crate::config::PoolConfig;
use crate::domain::{Address, Amount, Decimals, FeeTier, Token, TokenPair};
use crate::pools::ConstantProductPool;
use crate::traits::FromConfig;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn tok_a() -> Token {
    let Ok(d) = Decimals::new(18) else {
        panic!("valid decimals");
    };
    Token::new(Address::repeat_byte(1), d)
}

fn tok_b() -> Token {
    let Ok(d) = Decimals::new(8) else {
        panic!("valid decimals");
    };
    Token::new(Address::repeat_byte(2), d)
}

fn make_cp(ra: u128, rb: u128) -> ConstantProductPool {
    let Ok(pair) = TokenPair::new(tok_a(), tok_b()) else {
        panic!("expected valid pair");
    };
    let Ok(cfg) = PoolConfig::new(
        pair,
        FeeTier::TIER_0_30_PERCENT,
        Amount::new(ra),
        Amount::new(rb),
    ) else {
        panic!("expected valid config");
    };
    let Ok(pool) = ConstantProductPool::from_config(&cfg) else {
        panic!("expected valid pool");
    };
    pool
}

fn k(pool: &ConstantProductPool) -> U256 {
    U256::from(pool.reserve_first().get()) * U256::from(pool.reserve_second().get())
}

/// Reserves from dust-heavy to 18-decimal whale sizes.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    prop_oneof![
        10_000u128..=10_000_000u128,
        10u128.pow(20)..=10u128.pow(27),
    ]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_reversibility(ra in reserve_strategy(), rb in reserve_strategy()) {
        let swap_in = (ra / 1_000).max(1);
        let mut pool = make_cp(ra, rb);

        let Ok(received_b) = pool.swap_exact_in(tok_a().raw(swap_in)) else {
            return Ok(());
        };
        let Ok(final_a) = pool.swap_exact_in(tok_b().raw(received_b.get())) else {
            return Ok(());
        };

        prop_assert!(
            final_a.get() <= swap_in,
            "round-trip should lose value: final={} > original={}",
            final_a, swap_in
        );
    }

    #[test]
    fn prop_invariant_preservation(ra in reserve_strategy(), rb in reserve_strategy()) {
        let swap_in = (ra / 500).max(1);
        let mut pool = make_cp(ra, rb);
        let k_before = k(&pool);

        for i in 0..6 {
            let leg = if i % 2 == 0 { tok_a().raw(swap_in) } else { tok_b().raw((rb / 500).max(1)) };
            if pool.swap_exact_in(leg).is_err() { break; }
        }

        prop_assert!(k(&pool) >= k_before, "k shrank across swaps");
    }

    #[test]
    fn prop_output_monotonicity(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        small in 1u128..=1_000_000u128,
        extra in 0u128..=1_000_000u128,
    ) {
        let pool = make_cp(ra, rb);
        let Ok(out_small) = pool.quote_exact_in(tok_a().raw(small)) else {
            return Ok(());
        };
        let Ok(out_large) = pool.quote_exact_in(tok_a().raw(small + extra)) else {
            return Ok(());
        };
        prop_assert!(out_large >= out_small);
    }

    #[test]
    fn prop_liquidity_conservation(ra in reserve_strategy(), rb in reserve_strategy()) {
        let mut pool = make_cp(ra, rb);
        let supply_before = pool.total_supply();

        let add_a = ra / 10;
        let add_b = rb / 10;
        let Ok((used_a, used_b)) = pool.quote_deposit(
            (Amount::new(add_a), Amount::new(add_b)),
            (Amount::ZERO, Amount::ZERO),
        ) else {
            return Ok(());
        };
        let Ok(minted) = pool.deposit(used_a, used_b) else {
            return Ok(());
        };
        let Ok((out_a, out_b)) = pool.withdraw(minted) else {
            return Ok(());
        };

        prop_assert!(out_a <= used_a, "withdrew more A than deposited");
        prop_assert!(out_b <= used_b, "withdrew more B than deposited");
        prop_assert_eq!(pool.total_supply(), supply_before);
    }

    #[test]
    fn prop_flash_fee_floor(ra in reserve_strategy(), rb in reserve_strategy(), share in 1u128..=999u128) {
        let pool = make_cp(ra, rb);
        let principal = (ra * share / 1_000).max(1);
        let Ok((owed, fee)) = pool.flash_repayment(tok_a().raw(principal), &tok_a()) else {
            return Ok(());
        };
        prop_assert!(fee.get() >= 1);
        prop_assert_eq!(owed.get(), principal + fee.get());
    }
}
