//! Checked arithmetic returning [`RouterError`] instead of `Option`.
//!
//! # Examples
//!
//! ```
//! use hydra_router::domain::{Amount, Rounding};
//! use hydra_router::math::CheckedArithmetic;
//!
//! let owed = Amount::new(100).safe_add(&Amount::new(3));
//! assert_eq!(owed, Ok(Amount::new(103)));
//! assert!(Amount::new(1).safe_sub(&Amount::new(2)).is_err());
//! ```

use crate::domain::{Amount, Rounding};
use crate::error::RouterError;

/// Fallible arithmetic for domain wrapper types.
///
/// Every method reports a distinct error variant so callers can tell an
/// overflow from a balance going negative or a division by zero. Nothing
/// saturates.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Overflow`] if the sum does not fit.
    fn safe_add(&self, other: &Self) -> Result<Self, RouterError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, RouterError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Overflow`] if the product does not fit.
    fn safe_mul(&self, other: &Self) -> Result<Self, RouterError>;

    /// Checked division with explicit [`Rounding`].
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, RouterError>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, RouterError> {
        self.checked_add(other)
            .ok_or(RouterError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, RouterError> {
        self.checked_sub(other)
            .ok_or(RouterError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, RouterError> {
        self.checked_mul(other)
            .ok_or(RouterError::Overflow("amount multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, RouterError> {
        self.checked_div(other, rounding)
            .ok_or(RouterError::DivisionByZero)
    }
}
