//! Raw token magnitude with checked arithmetic.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Rounding;

/// A raw token magnitude in the token's smallest unit (wei, satoshi, ...).
///
/// `Amount` never interprets decimals; pair it with a [`Token`](super::Token)
/// through [`TokenAmount`](super::TokenAmount) whenever the unit matters.
/// Arithmetic is checked and returns `None` instead of wrapping.
///
/// Serializes as a decimal string, since 18-decimal magnitudes do not fit
/// the 64-bit integers of TOML or JSON. Plain integers are accepted on input.
///
/// # Examples
///
/// ```
/// use hydra_router::domain::{Amount, Rounding};
///
/// let a = Amount::new(10);
/// assert_eq!(a.checked_div(&Amount::new(3), Rounding::Up), Some(Amount::new(4)));
/// assert_eq!(Amount::ZERO.checked_sub(&a), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked multiplication. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_mul(&self, other: &Self) -> Option<Self> {
        match self.0.checked_mul(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked division with an explicit rounding direction.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        match crate::math::div_round(self.0, divisor.0, rounding) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Absolute difference between two amounts.
    pub const fn abs_diff(&self, other: &Self) -> Self {
        Self(self.0.abs_diff(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Int(v) => Ok(Self(u128::from(v))),
            Raw::Text(s) => s.parse().map(Self).map_err(serde::de::Error::custom),
        }
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}
