//! Swap request and its output floor.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Address, Amount, Token, TokenAmount, TokenPair};
use crate::error::{Result, RouterError};

/// The minimum output a swap must produce.
///
/// `Unbounded` is the deliberate "accept any output" choice. It trades
/// front-running protection for guaranteed fills and has to be spelled out
/// by the caller; nothing in the router defaults to it silently. A router
/// configured with `require_output_floor` refuses it outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFloor {
    /// Any output, including a single raw unit, is acceptable.
    Unbounded,
    /// Execution must yield at least this much of the output token.
    AtLeast(Amount),
}

impl OutputFloor {
    /// Builds a floor; a zero minimum is the same as [`OutputFloor::Unbounded`].
    pub const fn at_least(minimum: Amount) -> Self {
        if minimum.is_zero() {
            Self::Unbounded
        } else {
            Self::AtLeast(minimum)
        }
    }

    /// The floor as the raw minimum the venue enforces.
    pub const fn minimum(&self) -> Amount {
        match self {
            Self::Unbounded => Amount::ZERO,
            Self::AtLeast(min) => *min,
        }
    }

    /// Returns `true` for [`OutputFloor::Unbounded`].
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Returns `true` if `output` satisfies the floor.
    #[must_use]
    pub const fn admits(&self, output: Amount) -> bool {
        output.get() >= self.minimum().get()
    }
}

impl fmt::Display for OutputFloor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::AtLeast(min) => write!(f, ">= {min}"),
        }
    }
}

/// A request to sell an exact input amount for the pair's other token.
///
/// # Examples
///
/// ```
/// use hydra_router::domain::{Address, Amount, Decimals, OutputFloor, SwapRequest, Token, TokenPair};
///
/// let dai = Token::new(Address::repeat_byte(0x6b), Decimals::new(18).expect("valid"));
/// let wbtc = Token::new(Address::repeat_byte(0x22), Decimals::new(8).expect("valid"));
/// let pair = TokenPair::new(dai, wbtc).expect("distinct");
///
/// let req = SwapRequest::new(
///     pair,
///     dai.units(25_000),
///     OutputFloor::at_least(Amount::new(80_000_000)),
///     Address::repeat_byte(0xee),
/// )
/// .expect("valid request");
/// assert_eq!(req.token_out(), wbtc);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SwapRequestFields")]
pub struct SwapRequest {
    pair: TokenPair,
    amount_in: TokenAmount,
    floor: OutputFloor,
    recipient: Address,
}

#[derive(Deserialize)]
struct SwapRequestFields {
    pair: TokenPair,
    amount_in: TokenAmount,
    floor: OutputFloor,
    recipient: Address,
}

impl TryFrom<SwapRequestFields> for SwapRequest {
    type Error = RouterError;

    fn try_from(f: SwapRequestFields) -> Result<Self> {
        Self::new(f.pair, f.amount_in, f.floor, f.recipient)
    }
}

impl SwapRequest {
    /// Creates a swap request.
    ///
    /// A zero input is accepted here and rejected by the router with
    /// [`RouterError::ZeroInput`], so both the quote and the swap report it
    /// the same way.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidToken`] if the input token is not in `pair`.
    /// - [`RouterError::InvalidQuantity`] if `recipient` is the zero address.
    pub fn new(
        pair: TokenPair,
        amount_in: TokenAmount,
        floor: OutputFloor,
        recipient: Address,
    ) -> Result<Self> {
        if !pair.contains(&amount_in.token()) {
            return Err(RouterError::InvalidToken(
                "input token is not part of the pair",
            ));
        }
        if recipient.is_zero() {
            return Err(RouterError::InvalidQuantity(
                "swap recipient must not be the zero address",
            ));
        }
        Ok(Self {
            pair,
            amount_in,
            floor,
            recipient,
        })
    }

    /// Returns the pair traded.
    #[must_use]
    pub const fn pair(&self) -> &TokenPair {
        &self.pair
    }

    /// Returns the exact input.
    #[must_use]
    pub const fn amount_in(&self) -> TokenAmount {
        self.amount_in
    }

    /// Returns the input token.
    #[must_use]
    pub const fn token_in(&self) -> Token {
        self.amount_in.token()
    }

    /// Returns the output token.
    #[must_use]
    pub fn token_out(&self) -> Token {
        // Membership is checked in `new`.
        if self.pair.is_first(&self.amount_in.token()) {
            self.pair.second()
        } else {
            self.pair.first()
        }
    }

    /// Returns the output floor.
    #[must_use]
    pub const fn floor(&self) -> OutputFloor {
        self.floor
    }

    /// Returns who receives the output.
    #[must_use]
    pub const fn recipient(&self) -> Address {
        self.recipient
    }
}
