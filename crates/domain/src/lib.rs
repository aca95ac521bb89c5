//! Integer math and records of a concentrated-liquidity pool.
//!
//! All prices are Q64.96 square roots and all fee-growth accumulators are
//! Q128, matching the on-chain representation bit for bit.

/// Tick and position records.
pub mod entities;
/// Error types.
pub mod error;
/// Fixed-point math primitives.
pub mod math;
/// Fee tiers and reporting views.
pub mod value_objects;

pub use error::MathError;
