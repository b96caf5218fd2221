//! Router and pool configuration.
//!
//! [`RouterConfig`] carries the operator's settings and loads from TOML.
//! [`PoolConfig`] is the blueprint the in-memory venue seeds pools from.

mod pool;
mod router;

pub use pool::PoolConfig;
pub use router::RouterConfig;
