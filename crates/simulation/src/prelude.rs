//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use clmm_sim_simulation::prelude::*;
//! ```

// Errors
pub use crate::error::{PoolError, PoolResult, ReplayError};

// Pool
pub use crate::pool::{Pool, PositionKey, SwapResult};

// Replay
pub use crate::replay::{
    Divergence, Rejection, ReplayMode, ReplayOptions, ReplaySummary, apply, replay,
};

// Ticks
pub use crate::tick_ledger::{TickLedger, fee_growth_inside};

// Transaction log
pub use crate::transaction::{
    FlashRecord, LiquidityRecord, SwapRecord, Transaction, parse_transactions, read_transactions,
};
