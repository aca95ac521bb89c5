//! Concentrated-liquidity pool state machine.
//!
//! The pool owns the current price, the active liquidity, the global fee
//! growth accumulators, the tick ledger and the position book. Every public
//! mutator is all-or-nothing: the new state is computed first and written
//! back only once nothing can fail any more.
//!
//! Liquidity can be added in two ways:
//! - [`Pool::mint`] / [`Pool::burn`] track a position per range, credit
//!   fees to it and report the token amounts implied by the change.
//! - [`Pool::apply_external_mint`] / [`Pool::apply_external_burn`] only move
//!   ticks and active liquidity. They replay liquidity owned by other
//!   participants without mixing it into the tracked positions.

use crate::error::{PoolError, PoolResult};
use crate::tick_ledger::{TickLedger, fee_growth_inside};
use clmm_sim_domain::MathError;
use clmm_sim_domain::entities::{Position, Tick};
use clmm_sim_domain::math::full_math::{mul_div, mul_div_rounding_up};
use clmm_sim_domain::math::liquidity_math::add_delta;
use clmm_sim_domain::math::sqrt_price_math::{get_amount0_delta_signed, get_amount1_delta_signed};
use clmm_sim_domain::math::swap_math::compute_swap_step;
use clmm_sim_domain::math::tick_math::{
    MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, get_sqrt_ratio_at_tick,
    get_tick_at_sqrt_ratio,
};
use clmm_sim_domain::math::{FEE_DENOMINATOR, Q128};
use clmm_sim_domain::value_objects::FeeTier;
use primitive_types::U256;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Positions are keyed by their `(tick_lower, tick_upper)` range.
pub type PositionKey = (i32, i32);

/// Realized outcome of a swap.
///
/// Amounts are signed from the pool's point of view: positive amounts were
/// paid into the pool, negative amounts paid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapResult {
    pub amount0: i128,
    pub amount1: i128,
    /// Initialized ticks crossed, in crossing order.
    pub crossed_ticks: Vec<i32>,
}

/// A concentrated-liquidity pool.
///
/// Cloning produces a fully independent copy, ticks and positions included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    token0: String,
    token1: String,
    fee_tier: FeeTier,
    sqrt_price_x96: U256,
    tick_current: i32,
    liquidity: u128,
    fee_growth_global0_x128: U256,
    fee_growth_global1_x128: U256,
    ticks: TickLedger,
    positions: BTreeMap<PositionKey, Position>,
}

/// Boundary ticks and active liquidity after a liquidity change, not yet
/// written back.
struct LiquidityChange {
    lower: Tick,
    upper: Tick,
    liquidity: u128,
}

/// Working state of the swap loop.
struct SwapState {
    amount_remaining: i128,
    amount_calculated: i128,
    sqrt_price_x96: U256,
    tick: i32,
    fee_growth_global_x128: U256,
    liquidity: u128,
}

impl Pool {
    /// Creates an empty pool at the given price.
    ///
    /// # Errors
    /// [`PoolError::UnsupportedFeeTier`] for a fee outside {500, 3000, 10000},
    /// [`PoolError::Math`] if the price is outside the valid range.
    pub fn new(
        token0: impl Into<String>,
        token1: impl Into<String>,
        fee_pips: u32,
        sqrt_price_x96: U256,
    ) -> PoolResult<Self> {
        let fee_tier =
            FeeTier::from_fee_pips(fee_pips).ok_or(PoolError::UnsupportedFeeTier(fee_pips))?;
        let tick_current = get_tick_at_sqrt_ratio(sqrt_price_x96)?;

        Ok(Self {
            token0: token0.into(),
            token1: token1.into(),
            fee_tier,
            sqrt_price_x96,
            tick_current,
            liquidity: 0,
            fee_growth_global0_x128: U256::zero(),
            fee_growth_global1_x128: U256::zero(),
            ticks: TickLedger::new(fee_tier.tick_spacing()),
            positions: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn token0(&self) -> &str {
        &self.token0
    }

    #[must_use]
    pub fn token1(&self) -> &str {
        &self.token1
    }

    #[must_use]
    pub fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    /// Fee in parts per million.
    #[must_use]
    pub fn fee(&self) -> u32 {
        self.fee_tier.fee_pips()
    }

    #[must_use]
    pub fn tick_spacing(&self) -> i32 {
        self.fee_tier.tick_spacing()
    }

    #[must_use]
    pub fn sqrt_price_x96(&self) -> U256 {
        self.sqrt_price_x96
    }

    #[must_use]
    pub fn tick_current(&self) -> i32 {
        self.tick_current
    }

    /// Liquidity active at the current tick.
    #[must_use]
    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    #[must_use]
    pub fn fee_growth_global0_x128(&self) -> U256 {
        self.fee_growth_global0_x128
    }

    #[must_use]
    pub fn fee_growth_global1_x128(&self) -> U256 {
        self.fee_growth_global1_x128
    }

    #[must_use]
    pub fn ticks(&self) -> &TickLedger {
        &self.ticks
    }

    /// Returns the tracked position for a range.
    #[must_use]
    pub fn position(&self, tick_lower: i32, tick_upper: i32) -> Option<&Position> {
        self.positions.get(&(tick_lower, tick_upper))
    }

    /// Iterates over tracked positions ordered by range.
    pub fn positions(&self) -> impl Iterator<Item = (&PositionKey, &Position)> {
        self.positions.iter()
    }

    /// Adds tracked liquidity to `[tick_lower, tick_upper)`.
    ///
    /// Returns the token amounts owed to the pool, rounded up.
    ///
    /// # Errors
    /// [`PoolError::ZeroLiquidityDelta`], [`PoolError::InvalidTickRange`], or
    /// any arithmetic failure. The pool is unchanged on error.
    pub fn mint(&mut self, tick_lower: i32, tick_upper: i32, amount: u128) -> PoolResult<(u128, u128)> {
        if amount == 0 {
            return Err(PoolError::ZeroLiquidityDelta);
        }
        let delta = i128::try_from(amount).map_err(|_| PoolError::AmountOverflow)?;

        let change = self.prepare_liquidity_change(tick_lower, tick_upper, delta)?;
        let (position, amount0, amount1) = self.prepare_position(&change, delta)?;
        self.commit_liquidity_change(change);
        self.positions.insert((tick_lower, tick_upper), position);

        debug!(
            tick_lower,
            tick_upper,
            amount,
            amount0,
            amount1,
            liquidity = self.liquidity,
            "minted position liquidity"
        );
        Ok((amount0.unsigned_abs(), amount1.unsigned_abs()))
    }

    /// Removes tracked liquidity from `[tick_lower, tick_upper)`.
    ///
    /// The released principal, rounded down, is returned and also credited
    /// to the position's owed balances so that [`collect`](Self::collect)
    /// pays out principal plus fees.
    ///
    /// # Errors
    /// [`PoolError::ZeroLiquidityDelta`], [`PoolError::PositionNotFound`],
    /// [`PoolError::InsufficientPositionLiquidity`], or any arithmetic
    /// failure. The pool is unchanged on error.
    pub fn burn(&mut self, tick_lower: i32, tick_upper: i32, amount: u128) -> PoolResult<(u128, u128)> {
        if amount == 0 {
            return Err(PoolError::ZeroLiquidityDelta);
        }
        let held = self
            .position(tick_lower, tick_upper)
            .ok_or(PoolError::PositionNotFound {
                lower: tick_lower,
                upper: tick_upper,
            })?
            .liquidity;
        if held < amount {
            return Err(PoolError::InsufficientPositionLiquidity);
        }
        let delta = -i128::try_from(amount).map_err(|_| PoolError::AmountOverflow)?;

        let change = self.prepare_liquidity_change(tick_lower, tick_upper, delta)?;
        let (mut position, amount0, amount1) = self.prepare_position(&change, delta)?;
        let released0 = amount0.unsigned_abs();
        let released1 = amount1.unsigned_abs();
        position.credit(U256::from(released0), U256::from(released1))?;
        self.commit_liquidity_change(change);
        self.positions.insert((tick_lower, tick_upper), position);

        debug!(
            tick_lower,
            tick_upper,
            amount,
            released0,
            released1,
            liquidity = self.liquidity,
            "burned position liquidity"
        );
        Ok((released0, released1))
    }

    /// Adds liquidity owned by another participant: ticks and active
    /// liquidity move, no position is tracked.
    ///
    /// # Errors
    /// [`PoolError::ZeroLiquidityDelta`], [`PoolError::InvalidTickRange`], or
    /// any arithmetic failure. The pool is unchanged on error.
    pub fn apply_external_mint(&mut self, tick_lower: i32, tick_upper: i32, amount: u128) -> PoolResult<()> {
        if amount == 0 {
            return Err(PoolError::ZeroLiquidityDelta);
        }
        let delta = i128::try_from(amount).map_err(|_| PoolError::AmountOverflow)?;
        let change = self.prepare_liquidity_change(tick_lower, tick_upper, delta)?;
        self.commit_liquidity_change(change);

        trace!(tick_lower, tick_upper, amount, "applied external mint");
        Ok(())
    }

    /// Removes liquidity owned by another participant.
    ///
    /// A zero amount only validates the range.
    ///
    /// # Errors
    /// [`PoolError::InvalidTickRange`], or [`PoolError::Math`] if more
    /// liquidity is removed than the ticks hold. The pool is unchanged on
    /// error.
    pub fn apply_external_burn(&mut self, tick_lower: i32, tick_upper: i32, amount: u128) -> PoolResult<()> {
        check_ticks(tick_lower, tick_upper)?;
        if amount == 0 {
            return Ok(());
        }
        let delta = -i128::try_from(amount).map_err(|_| PoolError::AmountOverflow)?;
        let change = self.prepare_liquidity_change(tick_lower, tick_upper, delta)?;
        self.commit_liquidity_change(change);

        trace!(tick_lower, tick_upper, amount, "applied external burn");
        Ok(())
    }

    /// Pays out and zeroes the owed balances of a tracked position.
    ///
    /// # Errors
    /// [`PoolError::PositionNotFound`] if the range was never minted.
    pub fn collect(&mut self, tick_lower: i32, tick_upper: i32) -> PoolResult<(U256, U256)> {
        let position = self
            .positions
            .get_mut(&(tick_lower, tick_upper))
            .ok_or(PoolError::PositionNotFound {
                lower: tick_lower,
                upper: tick_upper,
            })?;
        let (amount0, amount1) = position.take_owed();

        debug!(tick_lower, tick_upper, %amount0, %amount1, "collected position");
        Ok((amount0, amount1))
    }

    /// Distributes the fee on a flash loan of `amount0`/`amount1` to the
    /// active liquidity. No tokens move.
    ///
    /// # Errors
    /// [`PoolError::NoActiveLiquidity`] if nobody would earn the fee.
    pub fn flash(&mut self, amount0: u128, amount1: u128) -> PoolResult<()> {
        if self.liquidity == 0 {
            return Err(PoolError::NoActiveLiquidity);
        }
        let growth0 = self.flash_fee_growth(amount0)?;
        let growth1 = self.flash_fee_growth(amount1)?;

        self.fee_growth_global0_x128 = self.fee_growth_global0_x128.overflowing_add(growth0).0;
        self.fee_growth_global1_x128 = self.fee_growth_global1_x128.overflowing_add(growth1).0;

        debug!(amount0, amount1, "applied flash fees");
        Ok(())
    }

    /// Swaps exactly `amount_in` of `token_in` for the other token.
    ///
    /// A zero `sqrt_price_limit_x96` means no limit.
    ///
    /// # Errors
    /// [`PoolError::UnknownToken`] if `token_in` is not in the pool, plus
    /// the errors of [`swap`](Self::swap).
    pub fn swap_exact_input(
        &mut self,
        amount_in: u128,
        token_in: &str,
        sqrt_price_limit_x96: U256,
    ) -> PoolResult<SwapResult> {
        let zero_for_one = self.is_token0(token_in)?;
        let amount = i128::try_from(amount_in).map_err(|_| PoolError::AmountOverflow)?;
        self.swap(zero_for_one, amount, sqrt_price_limit_x96)
    }

    /// Swaps the other token for exactly `amount_out` of `token_out`.
    ///
    /// # Errors
    /// [`PoolError::UnknownToken`] if `token_out` is not in the pool, plus
    /// the errors of [`swap`](Self::swap).
    pub fn swap_exact_output(
        &mut self,
        amount_out: u128,
        token_out: &str,
        sqrt_price_limit_x96: U256,
    ) -> PoolResult<SwapResult> {
        let zero_for_one = !self.is_token0(token_out)?;
        let amount = i128::try_from(amount_out).map_err(|_| PoolError::AmountOverflow)?;
        self.swap(zero_for_one, -amount, sqrt_price_limit_x96)
    }

    /// Swaps token0 for token1 (`zero_for_one`) or the reverse.
    ///
    /// A positive `amount_specified` is an exact input, a negative one an
    /// exact output. The swap stops early when the price reaches
    /// `sqrt_price_limit_x96`; zero selects the widest possible limit.
    ///
    /// # Errors
    /// [`PoolError::ZeroAmountSpecified`], [`PoolError::InvalidPriceLimit`]
    /// when the limit is not strictly between the current price and the
    /// bound in the swap direction, or any arithmetic failure. The pool is
    /// unchanged on error.
    pub fn swap(
        &mut self,
        zero_for_one: bool,
        amount_specified: i128,
        sqrt_price_limit_x96: U256,
    ) -> PoolResult<SwapResult> {
        if amount_specified == 0 {
            return Err(PoolError::ZeroAmountSpecified);
        }
        let limit = self.resolve_price_limit(zero_for_one, sqrt_price_limit_x96)?;
        let exact_input = amount_specified > 0;

        let mut state = SwapState {
            amount_remaining: amount_specified,
            amount_calculated: 0,
            sqrt_price_x96: self.sqrt_price_x96,
            tick: self.tick_current,
            fee_growth_global_x128: if zero_for_one {
                self.fee_growth_global0_x128
            } else {
                self.fee_growth_global1_x128
            },
            liquidity: self.liquidity,
        };
        // (tick, fee growth 0, fee growth 1), applied once the loop succeeded
        let mut crossings: Vec<(i32, U256, U256)> = Vec::new();

        while state.amount_remaining != 0 && state.sqrt_price_x96 != limit {
            let sqrt_price_start = state.sqrt_price_x96;
            let (tick_next, initialized) = self
                .ticks
                .next_initialized_tick_within_one_word(state.tick, zero_for_one);
            let tick_next = tick_next.clamp(MIN_TICK, MAX_TICK);
            let sqrt_price_next = get_sqrt_ratio_at_tick(tick_next)?;

            let target = if (zero_for_one && sqrt_price_next < limit)
                || (!zero_for_one && sqrt_price_next > limit)
            {
                limit
            } else {
                sqrt_price_next
            };

            let step = compute_swap_step(
                state.sqrt_price_x96,
                target,
                state.liquidity,
                state.amount_remaining,
                self.fee(),
            )?;
            state.sqrt_price_x96 = step.sqrt_price_next_x96;

            let amount_in = to_i128(
                step.amount_in
                    .checked_add(step.fee_amount)
                    .ok_or(PoolError::AmountOverflow)?,
            )?;
            let amount_out = to_i128(step.amount_out)?;
            if exact_input {
                state.amount_remaining = checked(state.amount_remaining.checked_sub(amount_in))?;
                state.amount_calculated = checked(state.amount_calculated.checked_sub(amount_out))?;
            } else {
                state.amount_remaining = checked(state.amount_remaining.checked_add(amount_out))?;
                state.amount_calculated = checked(state.amount_calculated.checked_add(amount_in))?;
            }

            if state.liquidity > 0 {
                let growth = mul_div(step.fee_amount, Q128, U256::from(state.liquidity))?;
                state.fee_growth_global_x128 = state.fee_growth_global_x128.overflowing_add(growth).0;
            }

            if state.sqrt_price_x96 == sqrt_price_next {
                if initialized {
                    let liquidity_net = self
                        .ticks
                        .get(tick_next)
                        .ok_or(PoolError::TickNotInitialized(tick_next))?
                        .liquidity_net;
                    let delta = if zero_for_one {
                        liquidity_net.checked_neg().ok_or(MathError::Overflow)?
                    } else {
                        liquidity_net
                    };
                    state.liquidity = add_delta(state.liquidity, delta)?;

                    let (growth0, growth1) = if zero_for_one {
                        (state.fee_growth_global_x128, self.fee_growth_global1_x128)
                    } else {
                        (self.fee_growth_global0_x128, state.fee_growth_global_x128)
                    };
                    crossings.push((tick_next, growth0, growth1));
                    trace!(tick = tick_next, liquidity_net, liquidity = state.liquidity, "crossed tick");
                }
                state.tick = if zero_for_one { tick_next - 1 } else { tick_next };
            } else if state.sqrt_price_x96 != sqrt_price_start {
                state.tick = get_tick_at_sqrt_ratio(state.sqrt_price_x96)?;
            }
        }

        let amount_consumed = checked(amount_specified.checked_sub(state.amount_remaining))?;
        let (amount0, amount1) = if zero_for_one == exact_input {
            (amount_consumed, state.amount_calculated)
        } else {
            (state.amount_calculated, amount_consumed)
        };

        for &(index, growth0, growth1) in &crossings {
            // every staged tick was looked up during the loop
            self.ticks.cross(index, growth0, growth1)?;
        }
        self.sqrt_price_x96 = state.sqrt_price_x96;
        self.tick_current = state.tick;
        self.liquidity = state.liquidity;
        if zero_for_one {
            self.fee_growth_global0_x128 = state.fee_growth_global_x128;
        } else {
            self.fee_growth_global1_x128 = state.fee_growth_global_x128;
        }

        debug!(
            zero_for_one,
            amount_specified,
            amount0,
            amount1,
            sqrt_price = %self.sqrt_price_x96,
            tick = self.tick_current,
            crossed = crossings.len(),
            "swapped"
        );
        Ok(SwapResult {
            amount0,
            amount1,
            crossed_ticks: crossings.into_iter().map(|(index, _, _)| index).collect(),
        })
    }

    /// Re-verifies the structural invariants of the pool state.
    ///
    /// - the price lies in `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`;
    /// - the current tick matches the price, allowing the tick just below
    ///   an initialized boundary the price sits on after a downward cross;
    /// - active liquidity equals the net liquidity of all ticks at or below
    ///   the current tick;
    /// - every tick in the ledger is referenced by some liquidity.
    ///
    /// # Errors
    /// [`PoolError::InvariantViolation`] describing the first violation.
    pub fn check_invariants(&self) -> PoolResult<()> {
        if self.sqrt_price_x96 < MIN_SQRT_RATIO || self.sqrt_price_x96 >= MAX_SQRT_RATIO {
            return Err(PoolError::InvariantViolation(format!(
                "sqrt price {} out of range",
                self.sqrt_price_x96
            )));
        }

        let tick_at_price = get_tick_at_sqrt_ratio(self.sqrt_price_x96)?;
        let on_boundary_below = self.tick_current == tick_at_price - 1
            && get_sqrt_ratio_at_tick(tick_at_price)? == self.sqrt_price_x96;
        if self.tick_current != tick_at_price && !on_boundary_below {
            return Err(PoolError::InvariantViolation(format!(
                "tick {} does not match price tick {}",
                self.tick_current, tick_at_price
            )));
        }

        let mut net_below: i128 = 0;
        for tick in self.ticks.iter() {
            if !tick.is_initialized() {
                return Err(PoolError::InvariantViolation(format!(
                    "tick {} has no liquidity",
                    tick.index
                )));
            }
            if tick.index <= self.tick_current {
                net_below = checked(net_below.checked_add(tick.liquidity_net))?;
            }
        }
        if net_below != i128::try_from(self.liquidity).map_err(|_| PoolError::AmountOverflow)? {
            return Err(PoolError::InvariantViolation(format!(
                "active liquidity {} differs from net liquidity {}",
                self.liquidity, net_below
            )));
        }
        Ok(())
    }

    fn is_token0(&self, token: &str) -> PoolResult<bool> {
        if token == self.token0 {
            Ok(true)
        } else if token == self.token1 {
            Ok(false)
        } else {
            Err(PoolError::UnknownToken(token.to_string()))
        }
    }

    fn resolve_price_limit(&self, zero_for_one: bool, sqrt_price_limit_x96: U256) -> PoolResult<U256> {
        let limit = match (sqrt_price_limit_x96.is_zero(), zero_for_one) {
            (true, true) => MIN_SQRT_RATIO + U256::one(),
            (true, false) => MAX_SQRT_RATIO - U256::one(),
            (false, _) => sqrt_price_limit_x96,
        };
        let valid = if zero_for_one {
            limit < self.sqrt_price_x96 && limit > MIN_SQRT_RATIO
        } else {
            limit > self.sqrt_price_x96 && limit < MAX_SQRT_RATIO
        };
        if valid {
            Ok(limit)
        } else {
            Err(PoolError::InvalidPriceLimit(limit))
        }
    }

    fn flash_fee_growth(&self, amount: u128) -> PoolResult<U256> {
        let fee = mul_div_rounding_up(
            U256::from(amount),
            U256::from(self.fee()),
            U256::from(FEE_DENOMINATOR),
        )?;
        Ok(mul_div(fee, Q128, U256::from(self.liquidity))?)
    }

    /// Computes the updated boundary ticks and active liquidity.
    fn prepare_liquidity_change(
        &self,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: i128,
    ) -> PoolResult<LiquidityChange> {
        check_ticks(tick_lower, tick_upper)?;
        let lower = self.ticks.prepare_update(
            tick_lower,
            self.tick_current,
            liquidity_delta,
            self.fee_growth_global0_x128,
            self.fee_growth_global1_x128,
            false,
        )?;
        let upper = self.ticks.prepare_update(
            tick_upper,
            self.tick_current,
            liquidity_delta,
            self.fee_growth_global0_x128,
            self.fee_growth_global1_x128,
            true,
        )?;
        let liquidity = if (tick_lower..tick_upper).contains(&self.tick_current) {
            add_delta(self.liquidity, liquidity_delta)?
        } else {
            self.liquidity
        };
        Ok(LiquidityChange {
            lower,
            upper,
            liquidity,
        })
    }

    fn commit_liquidity_change(&mut self, change: LiquidityChange) {
        self.ticks.commit(change.lower);
        self.ticks.commit(change.upper);
        self.liquidity = change.liquidity;
    }

    /// Computes the updated position and the signed token amounts for a
    /// tracked liquidity change.
    fn prepare_position(
        &self,
        change: &LiquidityChange,
        liquidity_delta: i128,
    ) -> PoolResult<(Position, i128, i128)> {
        let tick_lower = change.lower.index;
        let tick_upper = change.upper.index;
        let (inside0, inside1) = fee_growth_inside(
            &change.lower,
            &change.upper,
            self.tick_current,
            self.fee_growth_global0_x128,
            self.fee_growth_global1_x128,
        );

        let mut position = self
            .position(tick_lower, tick_upper)
            .cloned()
            .unwrap_or_default();
        position.update(liquidity_delta, inside0, inside1)?;

        let sqrt_lower = get_sqrt_ratio_at_tick(tick_lower)?;
        let sqrt_upper = get_sqrt_ratio_at_tick(tick_upper)?;
        let (amount0, amount1) = if self.tick_current < tick_lower {
            (
                get_amount0_delta_signed(sqrt_lower, sqrt_upper, liquidity_delta)?,
                0,
            )
        } else if self.tick_current < tick_upper {
            (
                get_amount0_delta_signed(self.sqrt_price_x96, sqrt_upper, liquidity_delta)?,
                get_amount1_delta_signed(sqrt_lower, self.sqrt_price_x96, liquidity_delta)?,
            )
        } else {
            (
                0,
                get_amount1_delta_signed(sqrt_lower, sqrt_upper, liquidity_delta)?,
            )
        };
        Ok((position, amount0, amount1))
    }
}

fn check_ticks(tick_lower: i32, tick_upper: i32) -> PoolResult<()> {
    if tick_lower >= tick_upper || tick_lower < MIN_TICK || tick_upper > MAX_TICK {
        return Err(PoolError::InvalidTickRange {
            lower: tick_lower,
            upper: tick_upper,
        });
    }
    Ok(())
}

fn to_i128(amount: U256) -> PoolResult<i128> {
    if amount.bits() > 127 {
        return Err(PoolError::AmountOverflow);
    }
    Ok(amount.low_u128() as i128)
}

fn checked(amount: Option<i128>) -> PoolResult<i128> {
    amount.ok_or(PoolError::AmountOverflow)
}
