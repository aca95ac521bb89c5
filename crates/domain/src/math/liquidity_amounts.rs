//! Conversions between token budgets and liquidity for a price range.

use crate::error::MathError;
use crate::math::Q96;
use crate::math::full_math::mul_div;
use crate::math::sqrt_price_math::{get_amount0_delta, get_amount1_delta};
use primitive_types::U256;

/// Liquidity supported by `amount0` of token0 over `[a, b]`.
///
/// # Errors
/// [`MathError::DivisionByZero`] for an empty range, [`MathError::Overflow`]
/// if the result does not fit in `u128`.
pub fn get_liquidity_for_amount0(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
) -> Result<u128, MathError> {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let intermediate = mul_div(lower, upper, Q96)?;
    to_u128(mul_div(amount0, intermediate, upper - lower)?)
}

/// Liquidity supported by `amount1` of token1 over `[a, b]`.
///
/// # Errors
/// [`MathError::DivisionByZero`] for an empty range, [`MathError::Overflow`]
/// if the result does not fit in `u128`.
pub fn get_liquidity_for_amount1(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount1: U256,
) -> Result<u128, MathError> {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    to_u128(mul_div(amount1, Q96, upper - lower)?)
}

/// Largest liquidity that can be minted over `[a, b]` at the current price
/// without spending more than either budget.
///
/// # Errors
/// See [`get_liquidity_for_amount0`] and [`get_liquidity_for_amount1`].
pub fn get_liquidity_for_amounts(
    sqrt_ratio_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
    amount1: U256,
) -> Result<u128, MathError> {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= lower {
        get_liquidity_for_amount0(lower, upper, amount0)
    } else if sqrt_ratio_x96 < upper {
        let liquidity0 = get_liquidity_for_amount0(sqrt_ratio_x96, upper, amount0)?;
        let liquidity1 = get_liquidity_for_amount1(lower, sqrt_ratio_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        get_liquidity_for_amount1(lower, upper, amount1)
    }
}

/// Token amounts held by `liquidity` over `[a, b]` at the current price,
/// rounded down.
///
/// # Errors
/// Propagates [`MathError`] from the amount computations.
pub fn get_amounts_for_liquidity(
    sqrt_ratio_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
) -> Result<(U256, U256), MathError> {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= lower {
        Ok((get_amount0_delta(lower, upper, liquidity, false)?, U256::zero()))
    } else if sqrt_ratio_x96 < upper {
        Ok((
            get_amount0_delta(sqrt_ratio_x96, upper, liquidity, false)?,
            get_amount1_delta(lower, sqrt_ratio_x96, liquidity, false)?,
        ))
    } else {
        Ok((U256::zero(), get_amount1_delta(lower, upper, liquidity, false)?))
    }
}

fn sorted(a: U256, b: U256) -> (U256, U256) {
    if a > b { (b, a) } else { (a, b) }
}

fn to_u128(value: U256) -> Result<u128, MathError> {
    if value.bits() > 128 {
        Err(MathError::Overflow)
    } else {
        Ok(value.low_u128())
    }
}
