//! Arithmetic utilities for pricing and accounting.
//!
//! [`CheckedArithmetic`] for overflow-safe operations on domain amounts,
//! [`div_round`] for explicit division rounding, and the 256-bit
//! [`mul_div`] / [`sqrt_product`] helpers used by the pool curve.

mod checked;
mod full_math;

pub use checked::CheckedArithmetic;
pub use full_math::{div_round, mul_div, sqrt_product};
