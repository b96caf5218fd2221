//! Router configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Address, BasisPoints, RepaymentToken};
use crate::error::{Result, RouterError};

const fn default_slippage_tolerance() -> BasisPoints {
    BasisPoints::new(50)
}

const fn default_reset_approvals() -> bool {
    true
}

/// Operator settings for a [`Router`](crate::router::Router).
///
/// ```toml
/// custody = "0x1111111111111111111111111111111111111111"
/// require_output_floor = false
/// slippage_tolerance = 50
/// repayment = "borrowed"
/// reset_approvals = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Account holding the router's tokens on the ledger.
    pub custody: Address,

    /// Refuse swaps whose floor is [`OutputFloor::Unbounded`].
    ///
    /// [`OutputFloor::Unbounded`]: crate::domain::OutputFloor::Unbounded
    #[serde(default)]
    pub require_output_floor: bool,

    /// Tolerance used by `suggest_floor` when the caller gives none.
    #[serde(default = "default_slippage_tolerance")]
    pub slippage_tolerance: BasisPoints,

    /// Preferred repayment token for flash swaps.
    #[serde(default)]
    pub repayment: RepaymentToken,

    /// Zero a stale non-zero allowance before granting a new one.
    #[serde(default = "default_reset_approvals")]
    pub reset_approvals: bool,
}

impl RouterConfig {
    /// Creates a configuration with defaults for everything but custody.
    #[must_use]
    pub const fn new(custody: Address) -> Self {
        Self {
            custody,
            require_output_floor: false,
            slippage_tolerance: default_slippage_tolerance(),
            repayment: RepaymentToken::Borrowed,
            reset_approvals: default_reset_approvals(),
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// - [`RouterError::ConfigParse`] if the document is malformed.
    /// - [`RouterError::InvalidConfiguration`] if a value is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| RouterError::ConfigParse(e.to_string()))?;
        config.validate()?;
        debug!(custody = %config.custody, "loaded router configuration");
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::ConfigParse`] if the file cannot be read, plus
    /// everything [`RouterConfig::from_toml_str`] returns.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RouterError::ConfigParse(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if custody is the zero
    /// address or the tolerance is above 100%.
    pub fn validate(&self) -> Result<()> {
        if self.custody.is_zero() {
            return Err(RouterError::InvalidConfiguration(
                "custody must not be the zero address",
            ));
        }
        if !self.slippage_tolerance.is_valid_percent() {
            return Err(RouterError::InvalidConfiguration(
                "slippage tolerance must be at most 10000bp",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let text = r#"custody = "0x1111111111111111111111111111111111111111""#;
        let Ok(cfg) = RouterConfig::from_toml_str(text) else {
            panic!("expected Ok");
        };
        assert_eq!(cfg, RouterConfig::new(Address::repeat_byte(0x11)));
        assert!(!cfg.require_output_floor);
        assert!(cfg.reset_approvals);
        assert_eq!(cfg.slippage_tolerance, BasisPoints::new(50));
        assert_eq!(cfg.repayment, RepaymentToken::Borrowed);
    }

    #[test]
    fn explicit_fields() {
        let text = r#"
            custody = "0x2222222222222222222222222222222222222222"
            require_output_floor = true
            slippage_tolerance = 100
            repayment = "counter"
            reset_approvals = false
        "#;
        let Ok(cfg) = RouterConfig::from_toml_str(text) else {
            panic!("expected Ok");
        };
        assert!(cfg.require_output_floor);
        assert_eq!(cfg.slippage_tolerance, BasisPoints::new(100));
        assert_eq!(cfg.repayment, RepaymentToken::Counter);
        assert!(!cfg.reset_approvals);
    }

    #[test]
    fn zero_custody_rejected() {
        let text = r#"custody = "0x0000000000000000000000000000000000000000""#;
        assert!(matches!(
            RouterConfig::from_toml_str(text),
            Err(RouterError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn tolerance_above_full_rejected() {
        let mut cfg = RouterConfig::new(Address::repeat_byte(1));
        cfg.slippage_tolerance = BasisPoints::new(10_001);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_document() {
        assert!(matches!(
            RouterConfig::from_toml_str("custody = 12"),
            Err(RouterError::ConfigParse(_))
        ));
        assert!(matches!(
            RouterConfig::from_toml_str(r#"custody = "0x11"
            unknown = 1"#),
            Err(RouterError::ConfigParse(_))
        ));
    }
}
