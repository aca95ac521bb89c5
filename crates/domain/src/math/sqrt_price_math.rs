//! Token amounts between two prices and the price reached by an amount.
//!
//! Rounding always favours the pool: amounts paid in are rounded up,
//! amounts paid out are rounded down, and next-price computations round
//! in whichever direction keeps the swapper from receiving too much.

use crate::error::MathError;
use crate::math::full_math::{div_rounding_up, mul_div, mul_div_rounding_up};
use crate::math::{MAX_UINT160, Q96, RESOLUTION};
use primitive_types::U256;

/// Amount of token0 between two prices for a given liquidity:
/// `liquidity * 2^96 * (upper - lower) / (upper * lower)`.
///
/// # Errors
/// [`MathError::ZeroPrice`] if the lower price is zero, or an overflow of
/// the final quotient.
pub fn get_amount0_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, MathError> {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if lower.is_zero() {
        return Err(MathError::ZeroPrice);
    }

    let numerator1 = U256::from(liquidity) << RESOLUTION;
    let numerator2 = upper - lower;

    if round_up {
        div_rounding_up(mul_div_rounding_up(numerator1, numerator2, upper)?, lower)
    } else {
        Ok(mul_div(numerator1, numerator2, upper)? / lower)
    }
}

/// Amount of token1 between two prices for a given liquidity:
/// `liquidity * (upper - lower) / 2^96`.
///
/// # Errors
/// Overflow of the final quotient.
pub fn get_amount1_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, MathError> {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let liquidity = U256::from(liquidity);

    if round_up {
        mul_div_rounding_up(liquidity, upper - lower, Q96)
    } else {
        mul_div(liquidity, upper - lower, Q96)
    }
}

/// Signed token0 delta for a liquidity change: rounded up (owed to the pool)
/// when liquidity is added, rounded down and negated when it is removed.
///
/// # Errors
/// Same as [`get_amount0_delta`], plus [`MathError::Overflow`] if the
/// amount does not fit in `i128`.
pub fn get_amount0_delta_signed(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<i128, MathError> {
    let amount = get_amount0_delta(
        sqrt_ratio_a_x96,
        sqrt_ratio_b_x96,
        liquidity.unsigned_abs(),
        liquidity >= 0,
    )?;
    to_signed(amount, liquidity < 0)
}

/// Signed token1 delta for a liquidity change, see [`get_amount0_delta_signed`].
///
/// # Errors
/// Same as [`get_amount1_delta`], plus [`MathError::Overflow`] if the
/// amount does not fit in `i128`.
pub fn get_amount1_delta_signed(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<i128, MathError> {
    let amount = get_amount1_delta(
        sqrt_ratio_a_x96,
        sqrt_ratio_b_x96,
        liquidity.unsigned_abs(),
        liquidity >= 0,
    )?;
    to_signed(amount, liquidity < 0)
}

/// Price reached after adding `amount_in` of the input token.
///
/// Rounds so the target price is never overshot: down for token0 input
/// (price decreasing), down for token1 input (price increasing).
///
/// # Errors
/// [`MathError::ZeroPrice`] / [`MathError::ZeroLiquidity`] on degenerate
/// inputs, [`MathError::Overflow`] if the price leaves the Q64.96 range.
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, MathError> {
    check_curve(sqrt_price_x96, liquidity)?;
    if zero_for_one {
        next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Price reached after removing `amount_out` of the output token.
///
/// # Errors
/// [`MathError::ZeroPrice`] / [`MathError::ZeroLiquidity`] on degenerate
/// inputs, [`MathError::Underflow`] if the range does not hold enough of the
/// output token.
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256, MathError> {
    check_curve(sqrt_price_x96, liquidity)?;
    if zero_for_one {
        next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_out, false)
    }
}

fn next_sqrt_price_from_amount0_rounding_up(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, MathError> {
    if amount.is_zero() {
        return Ok(sqrt_price_x96);
    }
    let numerator1 = U256::from(liquidity) << RESOLUTION;

    if add {
        // liquidity * sqrtP / (liquidity + amount * sqrtP), when it fits
        if let Some(denominator) = amount
            .checked_mul(sqrt_price_x96)
            .and_then(|product| numerator1.checked_add(product))
        {
            return mul_div_rounding_up(numerator1, sqrt_price_x96, denominator);
        }
        // liquidity / (liquidity / sqrtP + amount)
        let denominator = (numerator1 / sqrt_price_x96)
            .checked_add(amount)
            .ok_or(MathError::Overflow)?;
        div_rounding_up(numerator1, denominator)
    } else {
        let product = amount
            .checked_mul(sqrt_price_x96)
            .filter(|product| numerator1 > *product)
            .ok_or(MathError::Underflow)?;
        to_uint160(mul_div_rounding_up(
            numerator1,
            sqrt_price_x96,
            numerator1 - product,
        )?)
    }
}

fn next_sqrt_price_from_amount1_rounding_down(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, MathError> {
    let liquidity = U256::from(liquidity);

    if add {
        let quotient = mul_div(amount, Q96, liquidity)?;
        let next = sqrt_price_x96
            .checked_add(quotient)
            .ok_or(MathError::Overflow)?;
        to_uint160(next)
    } else {
        let quotient = mul_div_rounding_up(amount, Q96, liquidity)?;
        if sqrt_price_x96 <= quotient {
            return Err(MathError::Underflow);
        }
        Ok(sqrt_price_x96 - quotient)
    }
}

fn check_curve(sqrt_price_x96: U256, liquidity: u128) -> Result<(), MathError> {
    if sqrt_price_x96.is_zero() {
        return Err(MathError::ZeroPrice);
    }
    if liquidity == 0 {
        return Err(MathError::ZeroLiquidity);
    }
    Ok(())
}

fn sorted(a: U256, b: U256) -> (U256, U256) {
    if a > b { (b, a) } else { (a, b) }
}

fn to_uint160(value: U256) -> Result<U256, MathError> {
    if value > MAX_UINT160 {
        Err(MathError::Overflow)
    } else {
        Ok(value)
    }
}

fn to_signed(amount: U256, negative: bool) -> Result<i128, MathError> {
    if amount > U256::from(i128::MAX as u128) {
        return Err(MathError::Overflow);
    }
    let value = amount.low_u128() as i128;
    Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::get_sqrt_ratio_at_tick;

    const LIQUIDITY: u128 = 1_000_000_000_000_000_000;

    fn u256(s: &str) -> U256 {
        U256::from_dec_str(s).unwrap()
    }

    fn tenth() -> U256 {
        U256::from(100_000_000_000_000_000u128)
    }

    #[test]
    fn test_amount0_delta_rounding() {
        let upper = get_sqrt_ratio_at_tick(1000).unwrap();
        assert_eq!(upper, u256("83290069058676223003182343270"));

        let up = get_amount0_delta(Q96, upper, LIQUIDITY, true).unwrap();
        let down = get_amount0_delta(Q96, upper, LIQUIDITY, false).unwrap();
        assert_eq!(up, U256::from(48_768_197_581_278_889u128));
        assert_eq!(down, U256::from(48_768_197_581_278_888u128));

        // argument order does not matter
        assert_eq!(get_amount0_delta(upper, Q96, LIQUIDITY, true).unwrap(), up);
    }

    #[test]
    fn test_amount1_delta_rounding() {
        let upper = get_sqrt_ratio_at_tick(1000).unwrap();
        assert_eq!(
            get_amount1_delta(Q96, upper, LIQUIDITY, true).unwrap(),
            U256::from(51_268_468_376_766_591u128)
        );
        assert_eq!(
            get_amount1_delta(upper, Q96, LIQUIDITY, false).unwrap(),
            U256::from(51_268_468_376_766_590u128)
        );
    }

    #[test]
    fn test_amount_deltas_are_zero_for_empty_inputs() {
        let upper = get_sqrt_ratio_at_tick(1000).unwrap();
        assert!(get_amount0_delta(Q96, upper, 0, true).unwrap().is_zero());
        assert!(get_amount1_delta(Q96, upper, 0, true).unwrap().is_zero());
        assert!(get_amount0_delta(Q96, Q96, LIQUIDITY, true).unwrap().is_zero());
        assert!(get_amount1_delta(Q96, Q96, LIQUIDITY, true).unwrap().is_zero());
    }

    #[test]
    fn test_amount0_delta_zero_price() {
        assert_eq!(
            get_amount0_delta(U256::zero(), Q96, LIQUIDITY, true),
            Err(MathError::ZeroPrice)
        );
    }

    #[test]
    fn test_signed_deltas() {
        let upper = get_sqrt_ratio_at_tick(1000).unwrap();
        let liquidity = LIQUIDITY as i128;
        assert_eq!(
            get_amount0_delta_signed(Q96, upper, liquidity).unwrap(),
            48_768_197_581_278_889
        );
        assert_eq!(
            get_amount0_delta_signed(Q96, upper, -liquidity).unwrap(),
            -48_768_197_581_278_888
        );
        assert_eq!(
            get_amount1_delta_signed(Q96, upper, -liquidity).unwrap(),
            -51_268_468_376_766_590
        );
    }

    #[test]
    fn test_next_price_from_input() {
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, LIQUIDITY, tenth(), true).unwrap(),
            u256("72025602285694852357767227579")
        );
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, LIQUIDITY, tenth(), false).unwrap(),
            u256("87150978765690771352898345369")
        );
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, LIQUIDITY, U256::zero(), true).unwrap(),
            Q96
        );
    }

    #[test]
    fn test_next_price_from_output() {
        assert_eq!(
            get_next_sqrt_price_from_output(Q96, LIQUIDITY, tenth(), true).unwrap(),
            u256("71305346262837903834189555302")
        );
        assert_eq!(
            get_next_sqrt_price_from_output(Q96, LIQUIDITY, tenth(), false).unwrap(),
            u256("88031291682515930659493278152")
        );
    }

    #[test]
    fn test_next_price_rejects_degenerate_curve() {
        assert_eq!(
            get_next_sqrt_price_from_input(U256::zero(), LIQUIDITY, tenth(), true),
            Err(MathError::ZeroPrice)
        );
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, 0, tenth(), true),
            Err(MathError::ZeroLiquidity)
        );
    }

    #[test]
    fn test_next_price_input_overflow() {
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, 1, U256::MAX, true),
            Err(MathError::Overflow)
        );
        assert_eq!(
            get_next_sqrt_price_from_input(MAX_UINT160, 1024, U256::from(1024u32), false),
            Err(MathError::Overflow)
        );
    }

    #[test]
    fn test_next_price_output_exceeding_reserves() {
        // token1 reserves in range: liquidity * sqrtP / 2^96 == LIQUIDITY at price 1
        assert_eq!(
            get_next_sqrt_price_from_output(Q96, LIQUIDITY, U256::from(LIQUIDITY), true),
            Err(MathError::Underflow)
        );
        assert_eq!(
            get_next_sqrt_price_from_output(Q96, LIQUIDITY, U256::from(LIQUIDITY), false),
            Err(MathError::Underflow)
        );
    }
}
