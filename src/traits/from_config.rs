//! Construction from a validated configuration.
//!
//! Implementations must check every configuration invariant while
//! constructing, so a value that comes out of `from_config` is in a valid
//! initial state. There is no blanket implementation; each pairing of type
//! and config is explicit.

use crate::error::RouterError;

/// Builds `Self` from a configuration value.
///
/// # Implementors
///
/// - `impl FromConfig<PoolConfig> for ConstantProductPool`
pub trait FromConfig<C> {
    /// Creates a new instance from `config`.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidConfiguration`] if a parameter is out of
    ///   range or inconsistent.
    /// - [`RouterError::IdenticalTokens`] if a pair is degenerate.
    fn from_config(config: &C) -> Result<Self, RouterError>
    where
        Self: Sized;
}
