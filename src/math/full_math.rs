//! Integer math with explicit rounding and 256-bit intermediates.
//!
//! Reserves of 18-decimal tokens routinely exceed `10^24`, so products of two
//! reserves overflow `u128`. [`mul_div`] and [`sqrt_product`] widen to
//! [`U256`] for the intermediate step and narrow back once the result is
//! known to fit.
//!
//! **Round against the user**: outputs round down, inputs and fees round up.
//!
//! # Examples
//!
//! ```
//! use hydra_router::domain::Rounding;
//! use hydra_router::math::{div_round, mul_div};
//!
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! // 10^24 * 3 * 10^18 does not fit in u128, the quotient does.
//! let wide = mul_div(10u128.pow(24), 3 * 10u128.pow(18), 10u128.pow(20), Rounding::Down);
//! assert_eq!(wide, Ok(3 * 10u128.pow(22)));
//! ```

use alloy_primitives::U256;

use crate::domain::Rounding;
use crate::error::{Result, RouterError};

/// Divides `numerator` by `denominator`, rounding in the given direction.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Down => Some(quotient),
        // quotient < u128::MAX whenever a remainder exists, so +1 cannot wrap
        Rounding::Up if numerator % denominator != 0 => Some(quotient + 1),
        Rounding::Up => Some(quotient),
    }
}

/// Computes `a * b / denominator` without intermediate overflow.
///
/// # Errors
///
/// - [`RouterError::DivisionByZero`] if `denominator` is zero.
/// - [`RouterError::Overflow`] if the quotient does not fit in `u128`.
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Result<u128> {
    if denominator == 0 {
        return Err(RouterError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    let denom = U256::from(denominator);
    let mut quotient = product / denom;
    if rounding.is_up() && !(product % denom).is_zero() {
        quotient += U256::from(1u8);
    }
    narrow(quotient, "mul_div result exceeds u128")
}

/// Computes `floor(sqrt(a * b))` without intermediate overflow.
///
/// # Errors
///
/// Returns [`RouterError::Overflow`] if the root does not fit in `u128`,
/// which cannot happen for `u128` inputs but is still surfaced as an error.
pub fn sqrt_product(a: u128, b: u128) -> Result<u128> {
    let n = U256::from(a) * U256::from(b);
    if n.is_zero() {
        return Ok(0);
    }
    // Newton's method from above converges monotonically to floor(sqrt(n)).
    let two = U256::from(2u8);
    let mut x = n;
    let mut y = (x + U256::from(1u8)) / two;
    while y < x {
        x = y;
        y = (x + n / x) / two;
    }
    narrow(x, "square root exceeds u128")
}

fn narrow(value: U256, context: &'static str) -> Result<u128> {
    u128::try_from(value).map_err(|_| RouterError::Overflow(context))
}
