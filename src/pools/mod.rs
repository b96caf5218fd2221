//! Pool pricing curves.
//!
//! | Pool | Style |
//! |------|-------|
//! | [`ConstantProductPool`] | Uniswap V2 (`x · y = k`) |

pub mod constant_product;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use constant_product::ConstantProductPool;
