//! Collaborator seams.
//!
//! The router talks to the outside world only through these traits:
//! [`TokenLedger`] for balances and allowances, [`AmmVenue`] for pricing
//! and pool operations, [`FlashSwapCallback`] for the re-entry a flash loan
//! performs, and [`ExecutionEnvironment`] for all-or-nothing commits.
//! [`FromConfig`] covers configuration-driven construction.

mod amm_venue;
mod environment;
mod flash_callback;
mod from_config;
mod token_ledger;

pub use amm_venue::AmmVenue;
pub use environment::ExecutionEnvironment;
pub use flash_callback::FlashSwapCallback;
pub use from_config::FromConfig;
pub use token_ledger::TokenLedger;
