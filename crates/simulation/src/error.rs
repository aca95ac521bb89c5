//! Error types for pool operations.

use clmm_sim_domain::error::MathError;
use primitive_types::U256;
use std::io;
use thiserror::Error;

/// Failures of a pool operation.
///
/// A failed operation never modifies the pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Fixed-point math failure.
    #[error(transparent)]
    Math(#[from] MathError),
    /// Fee is not one of the supported tiers.
    #[error("unsupported fee tier: {0}")]
    UnsupportedFeeTier(u32),
    /// Lower tick not below upper tick, or a bound outside the tick domain.
    #[error("invalid tick range [{lower}, {upper})")]
    InvalidTickRange { lower: i32, upper: i32 },
    /// Mint or burn of zero liquidity.
    #[error("liquidity delta must be greater than zero")]
    ZeroLiquidityDelta,
    /// Swap of zero amount.
    #[error("amount specified must not be zero")]
    ZeroAmountSpecified,
    /// Price limit not strictly between the current price and the bound.
    #[error("invalid price limit: {0}")]
    InvalidPriceLimit(U256),
    /// Flash requires active liquidity to distribute fees to.
    #[error("no active liquidity")]
    NoActiveLiquidity,
    /// Token is neither token0 nor token1 of the pool.
    #[error("unknown token: {0}")]
    UnknownToken(String),
    /// A tick expected in the ledger is missing.
    #[error("tick {0} is not initialized")]
    TickNotInitialized(i32),
    /// No position exists for the range.
    #[error("no position for range [{lower}, {upper})")]
    PositionNotFound { lower: i32, upper: i32 },
    /// Burn exceeds the position's liquidity.
    #[error("insufficient position liquidity")]
    InsufficientPositionLiquidity,
    /// A token amount does not fit in a signed 128-bit integer.
    #[error("amount overflow")]
    AmountOverflow,
    /// The pool state violates one of its structural invariants.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Failures while loading or replaying a transaction log.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The log could not be read.
    #[error("failed to read transaction log: {0}")]
    Io(#[from] io::Error),
    /// The log is not valid JSON in the expected format.
    #[error("failed to parse transaction log: {0}")]
    Parse(#[from] serde_json::Error),
    /// A transaction was rejected by the pool.
    #[error("transaction {id} failed: {source}")]
    Transaction {
        id: String,
        #[source]
        source: PoolError,
    },
}
