//! Error types for the fixed-point math layer.

use primitive_types::U256;
use thiserror::Error;

/// Failures of the integer math primitives.
///
/// Every variant corresponds to a protocol-level invariant violation: the
/// caller passed values the on-chain implementation would revert on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// A division by zero was requested.
    #[error("division by zero")]
    DivisionByZero,
    /// The result does not fit in the target integer width.
    #[error("arithmetic overflow")]
    Overflow,
    /// The result would be negative in an unsigned context.
    #[error("arithmetic underflow")]
    Underflow,
    /// Tick outside of `[MIN_TICK, MAX_TICK]`.
    #[error("tick {0} is out of bounds")]
    TickOutOfBounds(i32),
    /// Square root price outside of `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`.
    #[error("sqrt price {0} is out of bounds")]
    SqrtPriceOutOfBounds(U256),
    /// A price computation required non-zero liquidity.
    #[error("liquidity must be greater than zero")]
    ZeroLiquidity,
    /// A price computation required a non-zero price.
    #[error("sqrt price must be greater than zero")]
    ZeroPrice,
}
