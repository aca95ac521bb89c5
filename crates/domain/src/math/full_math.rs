//! Multiply-then-divide without intermediate overflow.

use crate::error::MathError;
use primitive_types::{U256, U512};

/// Computes `floor(a * b / denominator)` with a full 512-bit intermediate
/// product.
///
/// # Errors
/// [`MathError::DivisionByZero`] if `denominator` is zero and
/// [`MathError::Overflow`] if the quotient does not fit in 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let quotient = a.full_mul(b) / U512::from(denominator);
    U256::try_from(quotient).map_err(|_| MathError::Overflow)
}

/// Computes `ceil(a * b / denominator)` with a full 512-bit intermediate
/// product.
///
/// # Errors
/// Same as [`mul_div`], plus [`MathError::Overflow`] when rounding up a
/// quotient equal to `U256::MAX`.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (quotient, remainder) = a.full_mul(b).div_mod(U512::from(denominator));
    let result = U256::try_from(quotient).map_err(|_| MathError::Overflow)?;
    if remainder.is_zero() {
        Ok(result)
    } else {
        result.checked_add(U256::one()).ok_or(MathError::Overflow)
    }
}

/// Computes `ceil(a / b)`.
///
/// # Errors
/// [`MathError::DivisionByZero`] if `b` is zero.
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (quotient, remainder) = a.div_mod(b);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        // quotient < U256::MAX whenever b > 1 leaves a remainder
        Ok(quotient + U256::one())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Q128;

    #[test]
    fn test_mul_div_simple() {
        let result = mul_div(U256::from(10u8), U256::from(20u8), U256::from(5u8)).unwrap();
        assert_eq!(result, U256::from(40u8));
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(
            mul_div(U256::from(10u8), U256::from(20u8), U256::zero()),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(
            mul_div_rounding_up(U256::from(10u8), U256::from(20u8), U256::zero()),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn test_mul_div_overflowing_quotient() {
        assert_eq!(mul_div(Q128, Q128, U256::one()), Err(MathError::Overflow));
        assert_eq!(
            mul_div(U256::MAX, U256::MAX, U256::MAX - U256::one()),
            Err(MathError::Overflow)
        );
    }

    #[test]
    fn test_mul_div_max_inputs() {
        assert_eq!(mul_div(U256::MAX, U256::MAX, U256::MAX).unwrap(), U256::MAX);
        assert_eq!(
            mul_div_rounding_up(U256::MAX, U256::MAX, U256::MAX).unwrap(),
            U256::MAX
        );
    }

    #[test]
    fn test_mul_div_without_phantom_overflow() {
        let b = Q128 * U256::from(50u8) / U256::from(100u8);
        let d = Q128 * U256::from(150u8) / U256::from(100u8);
        assert_eq!(mul_div(Q128, b, d).unwrap(), Q128 / U256::from(3u8));
    }

    #[test]
    fn test_mul_div_with_phantom_overflow() {
        let b = Q128 * U256::from(35u8);
        let d = Q128 * U256::from(8u8);
        assert_eq!(
            mul_div(Q128, b, d).unwrap(),
            Q128 * U256::from(4375u32) / U256::from(1000u32)
        );
    }

    #[test]
    fn test_mul_div_rounding_up_repeating_decimal() {
        let b = Q128 * U256::from(1000u32);
        let d = Q128 * U256::from(3000u32);
        assert_eq!(mul_div(Q128, b, d).unwrap(), Q128 / U256::from(3u8));
        assert_eq!(
            mul_div_rounding_up(Q128, b, d).unwrap(),
            Q128 / U256::from(3u8) + U256::one()
        );
    }

    #[test]
    fn test_mul_div_rounding_up_overflows_at_max() {
        let a = U256::from(535006138814359u64);
        let b = U256::from_dec_str(
            "432862656469423142931042426214547535783388063929571229938474969",
        )
        .unwrap();
        assert_eq!(mul_div(a, b, U256::from(2u8)).unwrap(), U256::MAX);
        assert_eq!(
            mul_div_rounding_up(a, b, U256::from(2u8)),
            Err(MathError::Overflow)
        );
    }

    #[test]
    fn test_div_rounding_up() {
        assert_eq!(
            div_rounding_up(U256::from(7u8), U256::from(2u8)).unwrap(),
            U256::from(4u8)
        );
        assert_eq!(
            div_rounding_up(U256::from(8u8), U256::from(2u8)).unwrap(),
            U256::from(4u8)
        );
        assert_eq!(
            div_rounding_up(U256::one(), U256::zero()),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn test_rounding_up_exceeds_floor_by_remainder_only() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let a = U256::from(rng.random::<u128>()) << rng.random_range(0..127usize);
            let b = U256::from(rng.random::<u128>());
            let denominator = U256::from(rng.random_range(1u128 << 127..=u128::MAX));

            let floor = mul_div(a, b, denominator).unwrap();
            let ceil = mul_div_rounding_up(a, b, denominator).unwrap();
            let exact = (U512::from(a) * U512::from(b)) % U512::from(denominator) == U512::zero();
            if exact {
                assert_eq!(ceil, floor);
            } else {
                assert_eq!(ceil, floor + U256::one());
            }
        }
    }
}
