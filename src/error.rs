//! Unified error type for the router.
//!
//! Every fallible operation in the crate returns [`RouterError`]. Any error
//! aborts the whole top-level operation: the execution environment discards
//! every state change made since the operation started, so callers observe
//! either the full effect or none of it.

use thiserror::Error;

use crate::domain::{Address, Amount, FlashSwapState};

/// Errors produced by the router, its collaborators and the sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The venue has no pool for the requested pair.
    #[error("venue has no pool for the requested pair")]
    UnsupportedPair,

    /// A quote or swap was requested for a zero input amount.
    #[error("input amount must be non-zero")]
    ZeroInput,

    /// Execution would yield less than the caller's floor.
    #[error("output {actual} is below the minimum of {minimum}")]
    SlippageExceeded {
        /// Caller-supplied floor.
        minimum: Amount,
        /// What execution would have produced.
        actual: Amount,
    },

    /// Removing liquidity would return less than a stated minimum.
    #[error("liquidity removal returns {actual} of {token}, minimum is {minimum}")]
    InsufficientLiquidityReturn {
        /// Token whose return fell short.
        token: Address,
        /// Caller-supplied minimum.
        minimum: Amount,
        /// Amount the pool would return.
        actual: Amount,
    },

    /// A flash swap asked for zero of both tokens.
    #[error("flash swap must borrow at least one token")]
    EmptyFlashSwap,

    /// Custody could not cover a flash-swap repayment.
    #[error("flash swap unpaid: {owed} of {token} owed, {available} available")]
    FlashSwapUnpaid {
        /// Repayment token.
        token: Address,
        /// Principal plus fee.
        owed: Amount,
        /// What was actually available.
        available: Amount,
    },

    /// Custody holds less than the operation needs to spend.
    #[error("custody holds {available} of {token}, operation needs {required}")]
    InsufficientCustodyBalance {
        /// Token being spent.
        token: Address,
        /// Amount the operation spends.
        required: Amount,
        /// Live custody balance.
        available: Amount,
    },

    /// An allowance could not be granted, or a spender exceeded it.
    #[error("authorization failed: {0}")]
    AuthorizationFailed(&'static str),

    /// A token pair was built from two identical addresses.
    #[error("token pair requires two distinct addresses")]
    IdenticalTokens,

    /// A token is unknown or not part of the pair in question.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// A quantity violates a request invariant.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A configuration document could not be parsed.
    #[error("configuration parse error: {0}")]
    ConfigParse(String),

    /// Pool reserves cannot satisfy the request.
    #[error("insufficient pool liquidity")]
    InsufficientLiquidity,

    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow, typically a balance going negative.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A flash swap was started while another one holds an open loan.
    #[error("a flash swap is already in progress")]
    ReentrantFlashSwap,

    /// The flash-swap state machine was driven along an illegal edge.
    #[error("illegal flash swap transition from {from} to {to}")]
    InvalidStateTransition {
        /// State before the attempted transition.
        from: FlashSwapState,
        /// Requested state.
        to: FlashSwapState,
    },

    /// The configuration demands an explicit output floor.
    #[error("swap request has no output floor and the router requires one")]
    SlippageGuardRequired,

    /// The venue asks for more than the caller's repayment hint allows.
    #[error("repayment of {owed} in {token} exceeds the hint of {hint}")]
    RepaymentExceedsHint {
        /// Repayment token.
        token: Address,
        /// Caller's ceiling.
        hint: Amount,
        /// Venue-computed obligation.
        owed: Amount,
    },

    /// The venue's observable effects disagree with what it reported.
    #[error("venue violated its contract: {0}")]
    VenueViolation(&'static str),

    /// The pool is locked by an in-flight flash loan.
    #[error("pool is locked")]
    PoolLocked,
}

/// Convenience alias used across the crate.
pub type Result<T> = core::result::Result<T, RouterError>;
