//! Liquidity position accounting.

use crate::error::MathError;
use crate::math::Q128;
use crate::math::full_math::mul_div;
use crate::math::liquidity_math::add_delta;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Accounting for one liquidity range.
///
/// Positions are never removed, so fees stay claimable after the liquidity
/// has been fully burned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Liquidity currently provided by the position.
    pub liquidity: u128,
    /// Fee growth inside the range at the last touch, token0.
    pub fee_growth_inside0_last_x128: U256,
    /// Fee growth inside the range at the last touch, token1.
    pub fee_growth_inside1_last_x128: U256,
    /// Token0 credited but not yet collected.
    pub tokens_owed0: U256,
    /// Token1 credited but not yet collected.
    pub tokens_owed1: U256,
}

impl Position {
    /// Creates an empty position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits fees accrued since the last touch, then applies
    /// `liquidity_delta` and snapshots the current inside fee growth.
    ///
    /// Fees are credited on the liquidity held before the change. Nothing is
    /// written if any step fails.
    ///
    /// # Errors
    /// [`MathError::Underflow`] when burning more than the position holds,
    /// [`MathError::Overflow`] if owed tokens or liquidity overflow.
    pub fn update(
        &mut self,
        liquidity_delta: i128,
        fee_growth_inside0_x128: U256,
        fee_growth_inside1_x128: U256,
    ) -> Result<(), MathError> {
        let liquidity_next = add_delta(self.liquidity, liquidity_delta)?;

        let owed0 = self.accrued(fee_growth_inside0_x128, self.fee_growth_inside0_last_x128)?;
        let owed1 = self.accrued(fee_growth_inside1_x128, self.fee_growth_inside1_last_x128)?;
        let tokens_owed0 = self.tokens_owed0.checked_add(owed0).ok_or(MathError::Overflow)?;
        let tokens_owed1 = self.tokens_owed1.checked_add(owed1).ok_or(MathError::Overflow)?;

        self.liquidity = liquidity_next;
        self.fee_growth_inside0_last_x128 = fee_growth_inside0_x128;
        self.fee_growth_inside1_last_x128 = fee_growth_inside1_x128;
        self.tokens_owed0 = tokens_owed0;
        self.tokens_owed1 = tokens_owed1;
        Ok(())
    }

    /// Adds released principal to the owed balances.
    ///
    /// # Errors
    /// [`MathError::Overflow`] if an owed balance overflows.
    pub fn credit(&mut self, amount0: U256, amount1: U256) -> Result<(), MathError> {
        let tokens_owed0 = self.tokens_owed0.checked_add(amount0).ok_or(MathError::Overflow)?;
        let tokens_owed1 = self.tokens_owed1.checked_add(amount1).ok_or(MathError::Overflow)?;
        self.tokens_owed0 = tokens_owed0;
        self.tokens_owed1 = tokens_owed1;
        Ok(())
    }

    /// Returns and zeroes the owed balances.
    pub fn take_owed(&mut self) -> (U256, U256) {
        let owed = (self.tokens_owed0, self.tokens_owed1);
        self.tokens_owed0 = U256::zero();
        self.tokens_owed1 = U256::zero();
        owed
    }

    fn accrued(&self, inside: U256, last: U256) -> Result<U256, MathError> {
        mul_div(inside.overflowing_sub(last).0, U256::from(self.liquidity), Q128)
    }
}
