//! In-memory collaborators for tests, demos and dry runs.
//!
//! [`InMemoryLedger`] stands in for the token contracts,
//! [`ConstantProductVenue`] for the AMM, and [`Sandbox`] ties them together
//! with snapshot rollback so a failed operation leaves balances untouched.
//! Together they let a [`Router`](crate::router::Router) replay a forked
//! chain scenario without a node.

mod environment;
mod ledger;
mod venue;

pub use environment::Sandbox;
pub use ledger::InMemoryLedger;
pub use venue::ConstantProductVenue;
