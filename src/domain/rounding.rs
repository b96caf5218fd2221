//! Explicit rounding direction.

/// Rounding direction for every division in the crate.
///
/// Amounts paid out round [`Down`](Rounding::Down); amounts owed (fees,
/// repayments, required inputs) round [`Up`](Rounding::Up), so integer
/// truncation always favours the pool over the caller.
///
/// # Examples
///
/// ```
/// use hydra_router::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert_eq!(Rounding::Up.flip(), Rounding::Down);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Towards positive infinity.
    Up,
    /// Towards zero.
    Down,
}

impl Rounding {
    /// Returns `true` for [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` for [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }

    /// The opposite direction.
    #[must_use]
    pub const fn flip(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}
