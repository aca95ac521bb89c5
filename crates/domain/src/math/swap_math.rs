//! Single swap step within one price range of constant liquidity.

use crate::error::MathError;
use crate::math::FEE_DENOMINATOR;
use crate::math::full_math::{mul_div, mul_div_rounding_up};
use crate::math::sqrt_price_math::{
    get_amount0_delta, get_amount1_delta, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};
use primitive_types::U256;

/// Outcome of one [`compute_swap_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    /// Price reached by the step, never past the target.
    pub sqrt_price_next_x96: U256,
    /// Input consumed, excluding the fee.
    pub amount_in: U256,
    /// Output produced.
    pub amount_out: U256,
    /// Fee charged on the input.
    pub fee_amount: U256,
}

/// Computes how far a swap moves between `sqrt_price_current_x96` and
/// `sqrt_price_target_x96` with `amount_remaining` left to trade.
///
/// Direction is inferred from the two prices: a target at or below the
/// current price swaps token0 for token1. A non-negative
/// `amount_remaining` is exact input, a negative one exact output.
///
/// # Errors
/// Propagates any [`MathError`] from the underlying price and amount math.
pub fn compute_swap_step(
    sqrt_price_current_x96: U256,
    sqrt_price_target_x96: U256,
    liquidity: u128,
    amount_remaining: i128,
    fee_pips: u32,
) -> Result<SwapStep, MathError> {
    let current = sqrt_price_current_x96;
    let target = sqrt_price_target_x96;
    let zero_for_one = current >= target;
    let exact_in = amount_remaining >= 0;
    let remaining = U256::from(amount_remaining.unsigned_abs());
    let denominator = U256::from(FEE_DENOMINATOR);
    let fee = U256::from(fee_pips);

    let mut amount_in = U256::zero();
    let mut amount_out = U256::zero();

    let sqrt_price_next_x96 = if exact_in {
        let remaining_less_fee = mul_div(remaining, denominator - fee, denominator)?;
        amount_in = if zero_for_one {
            get_amount0_delta(target, current, liquidity, true)?
        } else {
            get_amount1_delta(current, target, liquidity, true)?
        };
        if remaining_less_fee >= amount_in {
            target
        } else {
            get_next_sqrt_price_from_input(current, liquidity, remaining_less_fee, zero_for_one)?
        }
    } else {
        amount_out = if zero_for_one {
            get_amount1_delta(target, current, liquidity, false)?
        } else {
            get_amount0_delta(current, target, liquidity, false)?
        };
        if remaining >= amount_out {
            target
        } else {
            get_next_sqrt_price_from_output(current, liquidity, remaining, zero_for_one)?
        }
    };

    let reached_target = sqrt_price_next_x96 == target;

    if zero_for_one {
        if !(reached_target && exact_in) {
            amount_in = get_amount0_delta(sqrt_price_next_x96, current, liquidity, true)?;
        }
        if !(reached_target && !exact_in) {
            amount_out = get_amount1_delta(sqrt_price_next_x96, current, liquidity, false)?;
        }
    } else {
        if !(reached_target && exact_in) {
            amount_in = get_amount1_delta(current, sqrt_price_next_x96, liquidity, true)?;
        }
        if !(reached_target && !exact_in) {
            amount_out = get_amount0_delta(current, sqrt_price_next_x96, liquidity, false)?;
        }
    }

    // never hand out more than was asked for
    if !exact_in && amount_out > remaining {
        amount_out = remaining;
    }

    let fee_amount = if exact_in && !reached_target {
        // the remainder of the input is taken as fee
        remaining - amount_in
    } else {
        mul_div_rounding_up(amount_in, fee, denominator - fee)?
    };

    Ok(SwapStep {
        sqrt_price_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Q96;
    use crate::math::tick_math::get_sqrt_ratio_at_tick;

    fn u256(s: &str) -> U256 {
        U256::from_dec_str(s).unwrap()
    }

    #[test]
    fn test_partial_step_exact_input() {
        let step = compute_swap_step(
            u256("1344919684864506912172695223877090"),
            u256("1346938477169594858818217023321238"),
            731_344_820_973_715_931,
            26_412_237_337_162_431_364,
            500,
        )
        .unwrap();

        assert_eq!(
            step.sqrt_price_next_x96,
            u256("1346938477169594858818217023321238")
        );
        assert_eq!(step.amount_in, U256::from(18_635_208_114_057_179_514u128));
        assert_eq!(step.amount_out, U256::from(64_572_753_398u64));
        assert_eq!(step.fee_amount, U256::from(9_322_265_189_623_402u64));
    }

    #[test]
    fn test_exact_input_stops_before_target() {
        let target = get_sqrt_ratio_at_tick(-1000).unwrap();
        let remaining: i128 = 1_000_000;
        let step = compute_swap_step(Q96, target, 1_000_000_000_000_000_000, remaining, 3000).unwrap();

        assert!(step.sqrt_price_next_x96 < Q96);
        assert!(step.sqrt_price_next_x96 > target);
        // the whole input is consumed
        assert_eq!(step.amount_in + step.fee_amount, U256::from(remaining as u128));
    }

    #[test]
    fn test_exact_output_capped_at_remaining() {
        let target = get_sqrt_ratio_at_tick(1000).unwrap();
        let step = compute_swap_step(Q96, target, 1_000_000_000_000_000_000, -1_000_000, 3000).unwrap();

        assert!(step.sqrt_price_next_x96 > Q96);
        assert!(step.sqrt_price_next_x96 < target);
        assert!(step.amount_out <= U256::from(1_000_000u64));
        assert!(step.fee_amount > U256::zero());
    }

    #[test]
    fn test_exact_output_reaches_target() {
        let target = get_sqrt_ratio_at_tick(-10).unwrap();
        let liquidity = 1_000_000_000_000_000_000u128;
        let available = get_amount1_delta(target, Q96, liquidity, false).unwrap();
        let step = compute_swap_step(Q96, target, liquidity, -(10i128.pow(30)), 500).unwrap();

        assert_eq!(step.sqrt_price_next_x96, target);
        assert_eq!(step.amount_out, available);
    }

    #[test]
    fn test_zero_liquidity_moves_straight_to_target() {
        let target = get_sqrt_ratio_at_tick(60).unwrap();
        let step = compute_swap_step(Q96, target, 0, 1_000, 3000).unwrap();

        assert_eq!(step.sqrt_price_next_x96, target);
        assert!(step.amount_in.is_zero());
        assert!(step.amount_out.is_zero());
        assert!(step.fee_amount.is_zero());
    }

    #[test]
    fn test_input_plus_fee_never_exceeds_remaining() {
        let target = get_sqrt_ratio_at_tick(-200).unwrap();
        for remaining in [1i128, 7, 999, 123_456_789, 10i128.pow(18)] {
            let step = compute_swap_step(Q96, target, 10u128.pow(20), remaining, 10_000).unwrap();
            assert!(step.amount_in + step.fee_amount <= U256::from(remaining as u128));
        }
    }
}
