//! Human-readable prices derived from the fixed-point pool state.
//!
//! These are lossy views for reporting; the engine itself only works with
//! integer square-root prices.

use crate::math::RESOLUTION;
use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Price of token0 denominated in token1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Converts a Q64.96 square-root price, adjusting for token decimals.
    ///
    /// Returns `None` if the price does not fit in a [`Decimal`].
    #[must_use]
    pub fn from_sqrt_price_x96(sqrt_price_x96: U256, decimals0: u8, decimals1: u8) -> Option<Self> {
        let sqrt = u256_to_f64(sqrt_price_x96) / 2f64.powi(RESOLUTION as i32);
        let scale = 10f64.powi(i32::from(decimals0) - i32::from(decimals1));
        Decimal::from_f64(sqrt * sqrt * scale).map(Self::new)
    }

    /// Price at a tick: `1.0001^tick`.
    #[must_use]
    pub fn from_tick(tick: i32) -> Option<Self> {
        Decimal::from_f64(1.0001f64.powi(tick)).map(Self::new)
    }

    /// Nearest tick to this price, or `None` for non-positive prices.
    #[must_use]
    pub fn to_tick(&self) -> Option<i32> {
        if self.value <= Decimal::ZERO {
            return None;
        }
        let value = self.value.to_f64()?;
        Some(value.log(1.0001f64).round() as i32)
    }

    #[must_use]
    pub fn invert(&self) -> Self {
        if self.value.is_zero() {
            return Self {
                value: Decimal::ZERO,
            };
        }
        Self {
            value: Decimal::ONE / self.value,
        }
    }
}

fn u256_to_f64(value: U256) -> f64 {
    value
        .0
        .iter()
        .rev()
        .fold(0f64, |acc, limb| acc * 2f64.powi(64) + *limb as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Q96;
    use crate::math::tick_math::get_sqrt_ratio_at_tick;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unit_price() {
        let price = Price::from_sqrt_price_x96(Q96, 18, 18).unwrap();
        assert_eq!(price.value, dec!(1));
    }

    #[test]
    fn test_decimals_adjustment() {
        // token0 has 6 decimals, token1 has 18
        let price = Price::from_sqrt_price_x96(Q96, 6, 18).unwrap();
        assert!((price.value - dec!(0.000000000001)).abs() < dec!(0.0000000000000001));
    }

    #[test]
    fn test_sqrt_price_matches_tick_price() {
        let sqrt = get_sqrt_ratio_at_tick(100).unwrap();
        let from_sqrt = Price::from_sqrt_price_x96(sqrt, 18, 18).unwrap();
        let from_tick = Price::from_tick(100).unwrap();
        assert!((from_sqrt.value - from_tick.value).abs() < dec!(0.000001));
        assert_eq!(from_sqrt.to_tick(), Some(100));
    }

    #[test]
    fn test_to_tick() {
        assert_eq!(Price::new(dec!(1)).to_tick(), Some(0));
        assert_eq!(Price::new(dec!(1.01004966)).to_tick(), Some(100));
        assert_eq!(Price::new(dec!(0)).to_tick(), None);
    }

    #[test]
    fn test_invert() {
        assert_eq!(Price::new(dec!(4)).invert().value, dec!(0.25));
        assert_eq!(Price::new(dec!(0)).invert().value, dec!(0));
    }
}
