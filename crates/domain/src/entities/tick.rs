//! Initialized tick boundary.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// One initialized boundary in the tick ledger.
///
/// `fee_growth_outside_*` hold the fee growth accrued on the side of the
/// tick away from the current price. Only their differences are meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Tick index.
    pub index: i32,
    /// Total liquidity referencing this tick.
    pub liquidity_gross: u128,
    /// Liquidity added when the price crosses this tick upwards.
    pub liquidity_net: i128,
    /// Fee growth of token0 outside this tick, Q128.
    pub fee_growth_outside0_x128: U256,
    /// Fee growth of token1 outside this tick, Q128.
    pub fee_growth_outside1_x128: U256,
}

impl Tick {
    /// Creates an empty tick seeded with the given outside fee growth.
    #[must_use]
    pub fn new(index: i32, fee_growth_outside0_x128: U256, fee_growth_outside1_x128: U256) -> Self {
        Self {
            index,
            liquidity_gross: 0,
            liquidity_net: 0,
            fee_growth_outside0_x128,
            fee_growth_outside1_x128,
        }
    }

    /// Whether any liquidity still references this tick.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }

    /// Flips the outside fee growth to the other side of the tick.
    pub fn flip_outside(&mut self, fee_growth_global0_x128: U256, fee_growth_global1_x128: U256) {
        self.fee_growth_outside0_x128 = fee_growth_global0_x128
            .overflowing_sub(self.fee_growth_outside0_x128)
            .0;
        self.fee_growth_outside1_x128 = fee_growth_global1_x128
            .overflowing_sub(self.fee_growth_outside1_x128)
            .0;
    }
}
