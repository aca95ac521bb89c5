//! Stateful concentrated-liquidity pool engine.
//!
//! This crate builds on the integer math of `clmm-sim-domain`:
//! - Sparse tick ledger with word-bounded initialized-tick search
//! - Pool with tracked and external liquidity, swaps, flash fees and collection
//! - Transaction log records and a replay harness

/// Prelude module for convenient imports.
pub mod prelude;

/// Error types.
pub mod error;
/// Pool state machine.
pub mod pool;
/// Transaction log replay.
pub mod replay;
/// Initialized tick storage.
pub mod tick_ledger;
/// Transaction log records.
pub mod transaction;

pub use error::{PoolError, PoolResult, ReplayError};
pub use pool::{Pool, SwapResult};
pub use replay::{ReplayMode, ReplayOptions, ReplaySummary, replay};
pub use transaction::Transaction;
