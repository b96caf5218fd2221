//! Replays the forked-mainnet router session against the sandbox.
//!
//! Swaps DAI for WBTC at the quoted floor, adds and removes DAI/WBTC
//! liquidity, then runs a two-sided DAI/WETH flash swap repaid from
//! custody.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=hydra_router=debug cargo run --example fork_replay
//! cargo run --example fork_replay -- router.toml
//! ```

use std::path::Path;

use hydra_router::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Fork replay ===\n");

    // ── 1. Tokens and custody ───────────────────────────────────────────
    let dai = Token::new("0x6B175474E89094C44Da98b954EedeAC495271d0F".parse()?, Decimals::new(18)?);
    let wbtc = Token::new("0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599".parse()?, Decimals::new(8)?);
    let weth = Token::new("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse()?, Decimals::new(18)?);

    let config = match std::env::args().nth(1) {
        Some(path) => RouterConfig::load(Path::new(&path))?,
        None => RouterConfig::new("0x5B38Da6a701c568545dCfcB03FcB875f56beddC4".parse()?),
    };
    let custody = config.custody;

    // ── 2. Forked state ─────────────────────────────────────────────────
    let mut sandbox = Sandbox::with_venue("0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D".parse()?);
    for token in [dai, wbtc, weth] {
        sandbox.register_token(token)?;
    }
    sandbox.fund(&dai, custody, dai.units(1_100_000).amount())?;
    sandbox.fund(&wbtc, custody, wbtc.units(500).amount())?;
    sandbox.fund(&weth, custody, weth.units(50).amount())?;

    let dai_wbtc = TokenPair::new(dai, wbtc)?;
    let (first, second) = dai_wbtc.sort_amounts(
        &dai,
        dai.units(28_000_000).amount(),
        wbtc.units(1_000).amount(),
    )?;
    sandbox.open_pool(
        &PoolConfig::new(dai_wbtc, FeeTier::TIER_0_30_PERCENT, first, second)?,
        Address::repeat_byte(0x11),
    )?;

    let dai_weth = TokenPair::new(dai, weth)?;
    let (first, second) = dai_weth.sort_amounts(
        &dai,
        dai.units(20_000_000).amount(),
        weth.units(10_000).amount(),
    )?;
    sandbox.open_pool(
        &PoolConfig::new(dai_weth, FeeTier::TIER_0_30_PERCENT, first, second)?,
        Address::repeat_byte(0x12),
    )?;

    let mut router = Router::new(sandbox, config)?;

    // ── 3. Quote and swap ───────────────────────────────────────────────
    let amount_in = dai.units(25_000);
    let max_out = router.get_max_output(amount_in, wbtc)?;
    println!("Quote: {amount_in} -> {max_out}");

    let recipient: Address = "0xAb8483F64d9C6d1EcF9b849Ae677dD3315835cb2".parse()?;
    let swap = SwapRequest::new(
        dai_wbtc,
        amount_in,
        OutputFloor::at_least(max_out.amount()),
        recipient,
    )?;
    let receipt = router.swap_tokens(swap)?;
    println!("Swap:  {receipt}\n");

    // ── 4. Liquidity ────────────────────────────────────────────────────
    let deposit = LiquidityRequest::new(
        dai.units(1_000_000),
        wbtc.raw(500_000_000),
        dai.units(120_000).amount(),
        Amount::new(500_000_000),
        custody,
    )?;
    let added = router.add_liquidity(deposit)?;
    println!("Added:   {added}");

    let removed =
        router.remove_all_liquidity(dai, wbtc, Amount::new(1), Amount::new(1), custody)?;
    println!("Removed: {removed}\n");

    // ── 5. Flash swap ───────────────────────────────────────────────────
    let (first, second) = dai_weth.sort_amounts(
        &dai,
        dai.units(500).amount(),
        weth.units(10).amount(),
    )?;
    let flash = FlashSwapRequest::new(dai_weth, first, second)?;
    let settled = router.flash_swap(flash, |ledger, loan| {
        for obligation in loan.obligations() {
            let token = obligation.borrowed().token();
            println!(
                "  holding {} while owing {}",
                ledger.balance_of(&token, loan.borrower()),
                obligation.owed()
            );
        }
        Ok(())
    })?;
    for obligation in settled.obligations() {
        println!("Flash:   {obligation}");
    }
    println!("State:   {}", router.flash_state());

    // ── 6. Final custody ────────────────────────────────────────────────
    let ledger = router.env().ledger();
    println!("\nCustody after replay:");
    for token in [dai, wbtc, weth] {
        println!("  {}: {}", token.address(), ledger.balance_of(&token, custody));
    }

    Ok(())
}
