//! Scoped, exact-amount allowances.
//!
//! An allowance is granted immediately before the venue call that spends
//! it and cleared immediately after, so nothing is left for a later call to
//! draw on.

use tracing::trace;

use crate::domain::{Address, Amount, Token};
use crate::error::{Result, RouterError};
use crate::traits::TokenLedger;

/// One allowance the router grants for the duration of a venue call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Grant {
    pub token: Token,
    pub owner: Address,
    pub spender: Address,
    pub amount: Amount,
}

/// Grants exactly `grant.amount`, runs `f`, then clears the allowance.
///
/// With `reset` on, a stale non-zero allowance is first set to zero, for
/// tokens that refuse to change one non-zero allowance into another.
pub(super) fn with_exact_allowance<T>(
    ledger: &mut dyn TokenLedger,
    grant: Grant,
    reset: bool,
    f: impl FnOnce(&mut dyn TokenLedger) -> Result<T>,
) -> Result<T> {
    let Grant {
        token,
        owner,
        spender,
        amount,
    } = grant;

    if reset && !ledger.allowance(&token, owner, spender).is_zero() {
        ledger.approve(&token, owner, spender, Amount::ZERO)?;
    }
    ledger.approve(&token, owner, spender, amount)?;
    if ledger.allowance(&token, owner, spender) != amount {
        return Err(RouterError::AuthorizationFailed(
            "ledger did not record the exact allowance",
        ));
    }
    trace!(token = %token.address(), %spender, %amount, "allowance granted");

    let value = f(ledger)?;

    ledger.approve(&token, owner, spender, Amount::ZERO)?;
    trace!(token = %token.address(), %spender, "allowance cleared");
    Ok(value)
}

#[cfg(all(test, feature = "sandbox"))]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Decimals;
    use crate::sandbox::InMemoryLedger;

    const OWNER: Address = Address::repeat_byte(0xc5);
    const SPENDER: Address = Address::repeat_byte(0xee);

    fn setup() -> (InMemoryLedger, Token) {
        let Ok(d) = Decimals::new(6) else {
            panic!("decimals");
        };
        let usdt = Token::new(Address::repeat_byte(0xda), d);
        let mut ledger = InMemoryLedger::new();
        let Ok(()) = ledger.register_token(usdt, None) else {
            panic!("register");
        };
        let Ok(()) = ledger.credit(&usdt, OWNER, Amount::new(1_000)) else {
            panic!("credit");
        };
        (ledger, usdt)
    }

    fn grant(token: Token, amount: u128) -> Grant {
        Grant {
            token,
            owner: OWNER,
            spender: SPENDER,
            amount: Amount::new(amount),
        }
    }

    #[test]
    fn allowance_is_exact_inside_and_zero_after() {
        let (mut ledger, usdt) = setup();
        let seen = with_exact_allowance(&mut ledger, grant(usdt, 250), true, |ledger| {
            Ok(ledger.allowance(&usdt, OWNER, SPENDER))
        });
        assert_eq!(seen, Ok(Amount::new(250)));
        assert_eq!(ledger.allowance(&usdt, OWNER, SPENDER), Amount::ZERO);
    }

    #[test]
    fn stale_allowance_is_replaced_not_added() {
        let (mut ledger, usdt) = setup();
        let Ok(()) = ledger.approve(&usdt, OWNER, SPENDER, Amount::new(999)) else {
            panic!("approve");
        };
        let seen = with_exact_allowance(&mut ledger, grant(usdt, 10), true, |ledger| {
            Ok(ledger.allowance(&usdt, OWNER, SPENDER))
        });
        assert_eq!(seen, Ok(Amount::new(10)));
        assert_eq!(ledger.allowance(&usdt, OWNER, SPENDER), Amount::ZERO);
    }

    #[test]
    fn spender_cannot_draw_more_than_granted() {
        let (mut ledger, usdt) = setup();
        let result = with_exact_allowance(&mut ledger, grant(usdt, 10), false, |ledger| {
            ledger.transfer_from(&usdt, SPENDER, OWNER, SPENDER, Amount::new(11))
        });
        assert_eq!(
            result,
            Err(RouterError::AuthorizationFailed("allowance exceeded"))
        );
    }
}
