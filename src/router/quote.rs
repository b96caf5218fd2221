//! Quote engine.

use tracing::debug;

use super::Router;
use crate::domain::{Amount, BasisPoints, OutputFloor, Rounding, Token, TokenAmount, TokenPair};
use crate::error::{Result, RouterError};
use crate::traits::ExecutionEnvironment;

impl<E: ExecutionEnvironment> Router<E> {
    /// Output the venue would currently give for selling `amount_in`
    /// against `token_out`. Reads reserves only.
    ///
    /// # Errors
    ///
    /// - [`RouterError::ZeroInput`] if `amount_in` is zero.
    /// - [`RouterError::UnsupportedPair`] if the venue has no pool.
    /// - [`RouterError::IdenticalTokens`] if both tokens are the same.
    pub fn get_max_output(&self, amount_in: TokenAmount, token_out: Token) -> Result<TokenAmount> {
        if amount_in.is_zero() {
            return Err(RouterError::ZeroInput);
        }
        let pair = TokenPair::new(amount_in.token(), token_out)?;
        let venue = self.env.venue();
        if !venue.supports(&pair) {
            return Err(RouterError::UnsupportedPair);
        }
        let amount_out = venue.get_amount_out(amount_in, &token_out)?;
        debug!(%amount_in, %amount_out, token_out = %token_out.address(), "quote");
        Ok(TokenAmount::new(token_out, amount_out))
    }

    /// Floor that tolerates `tolerance` of slippage below `quote`, rounded
    /// down. Falls back to the configured tolerance.
    ///
    /// A non-zero quote never yields an unbounded floor: the suggestion is
    /// clamped to one raw unit.
    ///
    /// The result is advisory: [`swap_tokens`](Self::swap_tokens) never
    /// derives a floor on its own.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if `tolerance` exceeds
    /// 100%.
    pub fn suggest_floor(
        &self,
        quote: TokenAmount,
        tolerance: Option<BasisPoints>,
    ) -> Result<OutputFloor> {
        let tolerance = tolerance.unwrap_or(self.config.slippage_tolerance);
        if !tolerance.is_valid_percent() {
            return Err(RouterError::InvalidConfiguration(
                "slippage tolerance exceeds 100%",
            ));
        }
        let kept = tolerance.complement()?.apply(quote.amount(), Rounding::Down)?;
        if kept.is_zero() && !quote.is_zero() {
            return Ok(OutputFloor::at_least(Amount::new(1)));
        }
        Ok(OutputFloor::at_least(kept))
    }
}
