//! Exact integer math for concentrated-liquidity pools.
//!
//! All prices are Q64.96 square roots and all fee accumulators are Q128
//! fixed point numbers held in [`U256`]; intermediate products that may need
//! 512 bits are widened to [`primitive_types::U512`].

use primitive_types::U256;

pub mod full_math;
pub mod liquidity_amounts;
pub mod liquidity_math;
pub mod sqrt_price_math;
pub mod swap_math;
pub mod tick_math;

/// Number of fractional bits of a Q64.96 number.
pub const RESOLUTION: usize = 96;

/// 2^96.
pub const Q96: U256 = U256([0, 1 << 32, 0, 0]);

/// 2^128.
pub const Q128: U256 = U256([0, 0, 1, 0]);

/// 2^160 - 1, the largest value a square root price may take.
pub const MAX_UINT160: U256 = U256([u64::MAX, u64::MAX, u32::MAX as u64, 0]);

/// Denominator of fee amounts expressed in pips (hundredths of a basis point).
pub const FEE_DENOMINATOR: u32 = 1_000_000;
