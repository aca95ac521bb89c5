//! Supported fee tiers and their tick spacing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pool fee tier, in parts per million.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeTier {
    /// 0.05%, tick spacing 10.
    Low,
    /// 0.3%, tick spacing 60.
    Medium,
    /// 1%, tick spacing 200.
    High,
}

impl FeeTier {
    /// All supported tiers, lowest first.
    pub const ALL: [FeeTier; 3] = [FeeTier::Low, FeeTier::Medium, FeeTier::High];

    /// Looks up the tier charging `fee_pips`.
    #[must_use]
    pub fn from_fee_pips(fee_pips: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.fee_pips() == fee_pips)
    }

    /// Fee in parts per million.
    #[must_use]
    pub const fn fee_pips(self) -> u32 {
        match self {
            FeeTier::Low => 500,
            FeeTier::Medium => 3_000,
            FeeTier::High => 10_000,
        }
    }

    /// Distance between usable ticks.
    #[must_use]
    pub const fn tick_spacing(self) -> i32 {
        match self {
            FeeTier::Low => 10,
            FeeTier::Medium => 60,
            FeeTier::High => 200,
        }
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pips = self.fee_pips();
        write!(f, "{}.{:02}%", pips / 10_000, pips % 10_000 / 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_table() {
        assert_eq!(FeeTier::from_fee_pips(500).map(FeeTier::tick_spacing), Some(10));
        assert_eq!(FeeTier::from_fee_pips(3000).map(FeeTier::tick_spacing), Some(60));
        assert_eq!(FeeTier::from_fee_pips(10000).map(FeeTier::tick_spacing), Some(200));
    }

    #[test]
    fn test_unknown_fee_is_rejected() {
        assert_eq!(FeeTier::from_fee_pips(100), None);
        assert_eq!(FeeTier::from_fee_pips(0), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FeeTier::Low.to_string(), "0.05%");
        assert_eq!(FeeTier::Medium.to_string(), "0.30%");
        assert_eq!(FeeTier::High.to_string(), "1.00%");
    }
}
