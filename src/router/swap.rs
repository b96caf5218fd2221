//! Swap executor.

use tracing::{info, warn};

use super::approval::{with_exact_allowance, Grant};
use super::{ensure_balance, Router};
use crate::domain::{SwapReceipt, SwapRequest, TokenAmount};
use crate::error::{Result, RouterError};
use crate::traits::ExecutionEnvironment;

impl<E: ExecutionEnvironment> Router<E> {
    /// Sells exactly `request.amount_in()` from custody and delivers the
    /// output to the request's recipient.
    ///
    /// The floor is passed to the venue unchanged and the venue enforces
    /// it. Afterwards the router checks live balances: custody must have
    /// lost exactly the input, and the recipient must have gained what the
    /// venue reported.
    ///
    /// # Errors
    ///
    /// - [`RouterError::ZeroInput`] for a zero input.
    /// - [`RouterError::SlippageGuardRequired`] for an unbounded floor when
    ///   the configuration demands one.
    /// - [`RouterError::UnsupportedPair`] if the venue has no pool.
    /// - [`RouterError::InsufficientCustodyBalance`] if custody is short.
    /// - [`RouterError::SlippageExceeded`] if the output misses the floor.
    /// - [`RouterError::VenueViolation`] if balances disagree with the
    ///   venue's report.
    pub fn swap_tokens(&mut self, request: SwapRequest) -> Result<SwapReceipt> {
        if request.amount_in().is_zero() {
            return Err(RouterError::ZeroInput);
        }
        let floor = request.floor();
        if floor.is_unbounded() {
            if self.config.require_output_floor {
                return Err(RouterError::SlippageGuardRequired);
            }
            warn!(amount_in = %request.amount_in(), "swap without an output floor");
        }
        let custody = self.config.custody;
        let reset = self.config.reset_approvals;

        let receipt = self.env.execute_atomic(|ledger, venue| {
            if !venue.supports(request.pair()) {
                return Err(RouterError::UnsupportedPair);
            }
            ensure_balance(ledger, custody, request.amount_in())?;

            let token_in = request.token_in();
            let token_out = request.token_out();
            let recipient = request.recipient();
            let in_before = ledger.balance_of(&token_in, custody);
            let out_before = ledger.balance_of(&token_out, recipient);

            let grant = Grant {
                token: token_in,
                owner: custody,
                spender: venue.address(),
                amount: request.amount_in().amount(),
            };
            let reported = with_exact_allowance(ledger, grant, reset, |ledger| {
                venue.swap_exact_tokens_for_tokens(ledger, custody, &request)
            })?;

            let spent = in_before
                .checked_sub(&ledger.balance_of(&token_in, custody))
                .ok_or(RouterError::VenueViolation("custody input balance grew"))?;
            if spent != request.amount_in().amount() {
                return Err(RouterError::VenueViolation(
                    "venue drew a different input amount",
                ));
            }
            let received = ledger
                .balance_of(&token_out, recipient)
                .checked_sub(&out_before)
                .ok_or(RouterError::VenueViolation("recipient output balance fell"))?;
            if received != reported {
                return Err(RouterError::VenueViolation(
                    "delivered output differs from the reported output",
                ));
            }
            if !floor.admits(received) {
                return Err(RouterError::SlippageExceeded {
                    minimum: floor.minimum(),
                    actual: received,
                });
            }
            SwapReceipt::new(
                request.amount_in(),
                TokenAmount::new(token_out, received),
                recipient,
            )
        })?;

        info!(
            amount_in = %receipt.amount_in(),
            amount_out = %receipt.amount_out(),
            recipient = %receipt.recipient(),
            %floor,
            "swap executed"
        );
        Ok(receipt)
    }
}

#[cfg(all(test, feature = "sandbox"))]
#[allow(clippy::panic)]
mod tests {
    use crate::config::{PoolConfig, RouterConfig};
    use crate::domain::{
        Address, Amount, BasisPoints, Decimals, FeeTier, OutputFloor, SwapRequest, Token,
        TokenPair,
    };
    use crate::error::RouterError;
    use crate::math::CheckedArithmetic;
    use crate::router::Router;
    use crate::sandbox::Sandbox;
    use crate::traits::ExecutionEnvironment;

    const CUSTODY: Address = Address::repeat_byte(0xc5);
    const VENUE: Address = Address::repeat_byte(0xee);
    const RECIPIENT: Address = Address::repeat_byte(0x7e);

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

    fn router_with(config: RouterConfig) -> Router<Sandbox> {
        let mut sandbox = Sandbox::with_venue(VENUE);
        for t in [usdc(), weth()] {
            let Ok(()) = sandbox.register_token(t) else {
                panic!("register");
            };
        }
        let Ok(()) = sandbox.fund(&usdc(), CUSTODY, usdc().units(50_000).amount()) else {
            panic!("fund");
        };
        let Ok(pool) = PoolConfig::new(
            pair(),
            FeeTier::TIER_0_30_PERCENT,
            usdc().units(3_000_000).amount(),
            weth().units(1_000).amount(),
        ) else {
            panic!("pool config");
        };
        let Ok(_) = sandbox.open_pool(&pool, Address::repeat_byte(0x1f)) else {
            panic!("pool");
        };
        let Ok(router) = Router::new(sandbox, config) else {
            panic!("router");
        };
        router
    }

    fn router() -> Router<Sandbox> {
        router_with(RouterConfig::new(CUSTODY))
    }

    fn request(amount: u64, floor: OutputFloor) -> SwapRequest {
        let Ok(r) = SwapRequest::new(pair(), usdc().units(amount), floor, RECIPIENT) else {
            panic!("request");
        };
        r
    }

    #[test]
    fn swap_at_quoted_floor_delivers_quote() {
        let mut router = router();
        let Ok(quote) = router.get_max_output(usdc().units(3_000), weth()) else {
            panic!("quote");
        };
        let Ok(receipt) =
            router.swap_tokens(request(3_000, OutputFloor::at_least(quote.amount())))
        else {
            panic!("swap");
        };
        assert_eq!(receipt.amount_out(), quote);
        let ledger = router.env().ledger();
        assert_eq!(ledger.balance_of(&weth(), RECIPIENT), quote.amount());
        assert_eq!(
            ledger.balance_of(&usdc(), CUSTODY),
            usdc().units(47_000).amount()
        );
        assert_eq!(ledger.allowance(&usdc(), CUSTODY, VENUE), Amount::ZERO);
    }

    #[test]
    fn floor_above_quote_changes_nothing() {
        let mut router = router();
        let Ok(quote) = router.get_max_output(usdc().units(3_000), weth()) else {
            panic!("quote");
        };
        let Ok(too_high) = quote.amount().safe_add(&Amount::new(1)) else {
            panic!("add");
        };
        let result = router.swap_tokens(request(3_000, OutputFloor::at_least(too_high)));
        assert_eq!(
            result,
            Err(RouterError::SlippageExceeded {
                minimum: too_high,
                actual: quote.amount(),
            })
        );
        let ledger = router.env().ledger();
        assert_eq!(ledger.balance_of(&weth(), RECIPIENT), Amount::ZERO);
        assert_eq!(
            ledger.balance_of(&usdc(), CUSTODY),
            usdc().units(50_000).amount()
        );
        assert_eq!(router.get_max_output(usdc().units(3_000), weth()), Ok(quote));
    }

    #[test]
    fn short_custody_rejected() {
        let mut router = router();
        let Err(RouterError::InsufficientCustodyBalance { required, available, .. }) =
            router.swap_tokens(request(60_000, OutputFloor::Unbounded))
        else {
            panic!("expected a custody shortfall");
        };
        assert_eq!(required, usdc().units(60_000).amount());
        assert_eq!(available, usdc().units(50_000).amount());
    }

    #[test]
    fn unbounded_floor_refused_when_required() {
        let mut config = RouterConfig::new(CUSTODY);
        config.require_output_floor = true;
        let mut router = router_with(config);
        assert_eq!(
            router.swap_tokens(request(10, OutputFloor::Unbounded)),
            Err(RouterError::SlippageGuardRequired)
        );
        assert!(router
            .swap_tokens(request(10, OutputFloor::at_least(Amount::new(1))))
            .is_ok());
    }

    #[test]
    fn suggested_floor_for_dust_passes_required_guard() {
        let mut config = RouterConfig::new(CUSTODY);
        config.require_output_floor = true;
        let mut router = router_with(config);
        let Ok(quote) = router.get_max_output(usdc().raw(1), weth()) else {
            panic!("quote");
        };
        let Ok(floor) = router.suggest_floor(quote, Some(BasisPoints::new(10_000))) else {
            panic!("floor");
        };
        let Ok(req) = SwapRequest::new(pair(), usdc().raw(1), floor, RECIPIENT) else {
            panic!("request");
        };
        let Ok(receipt) = router.swap_tokens(req) else {
            panic!("swap with a suggested floor");
        };
        assert_eq!(receipt.amount_out(), quote);
    }

    #[test]
    fn unbounded_floor_allowed_by_default() {
        let mut router = router();
        assert!(router
            .swap_tokens(request(10, OutputFloor::Unbounded))
            .is_ok());
    }

    #[test]
    fn unknown_pair_unsupported() {
        let mut router = router();
        let Ok(other) = TokenPair::new(usdc(), token(0x22, 8)) else {
            panic!("pair");
        };
        let Ok(req) = SwapRequest::new(other, usdc().units(1), OutputFloor::Unbounded, RECIPIENT)
        else {
            panic!("request");
        };
        assert_eq!(router.swap_tokens(req), Err(RouterError::UnsupportedPair));
    }
}
