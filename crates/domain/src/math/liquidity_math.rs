//! Signed adjustments of unsigned liquidity.

use crate::error::MathError;

/// Adds a signed liquidity delta to an unsigned liquidity value.
///
/// # Errors
/// [`MathError::Underflow`] if the result would be negative and
/// [`MathError::Overflow`] if it exceeds `u128::MAX`.
pub fn add_delta(x: u128, y: i128) -> Result<u128, MathError> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs()).ok_or(MathError::Underflow)
    } else {
        x.checked_add(y.unsigned_abs()).ok_or(MathError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_delta() {
        assert_eq!(add_delta(1, 0).unwrap(), 1);
        assert_eq!(add_delta(1, -1).unwrap(), 0);
        assert_eq!(add_delta(1, 1).unwrap(), 2);
        assert_eq!(add_delta(0, i128::MIN), Err(MathError::Underflow));
        assert_eq!(add_delta(u128::MAX, 1), Err(MathError::Overflow));
        assert_eq!(add_delta(u128::MAX, i128::MIN).unwrap(), u128::MAX / 2);
    }

    #[test]
    fn test_add_delta_underflow() {
        assert_eq!(add_delta(3, -4), Err(MathError::Underflow));
    }
}
