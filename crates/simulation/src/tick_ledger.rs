//! Sparse store of initialized ticks.
//!
//! Ticks are kept in a vector sorted by index. The "next initialized tick"
//! query emulates a bitmap partitioned into 256-tick words, so a single
//! query never looks past the end of the word containing the start tick.

use crate::error::{PoolError, PoolResult};
use clmm_sim_domain::MathError;
use clmm_sim_domain::entities::Tick;
use clmm_sim_domain::math::liquidity_math::add_delta;
use primitive_types::U256;

/// Number of compressed ticks covered by one bitmap word.
const WORD_BITS: u32 = 8;

/// Ordered collection of initialized ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickLedger {
    tick_spacing: i32,
    ticks: Vec<Tick>,
}

impl TickLedger {
    /// Creates an empty ledger for the given tick spacing.
    #[must_use]
    pub fn new(tick_spacing: i32) -> Self {
        Self {
            tick_spacing,
            ticks: Vec::new(),
        }
    }

    #[must_use]
    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Returns the tick at `index`, if initialized.
    #[must_use]
    pub fn get(&self, index: i32) -> Option<&Tick> {
        self.search(index).ok().map(|position| &self.ticks[position])
    }

    /// Iterates over the ticks in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = &Tick> {
        self.ticks.iter()
    }

    /// Computes the state of tick `index` after applying `liquidity_delta`
    /// without writing it back.
    ///
    /// A lower bound adds the delta to `liquidity_net`, an upper bound
    /// subtracts it. `liquidity_gross` moves by the signed delta. A tick not
    /// yet in the ledger is seeded with the global fee growth as "outside"
    /// when it lies at or below the current tick.
    ///
    /// # Errors
    /// [`PoolError::Math`] if gross liquidity would underflow or net
    /// liquidity overflow.
    pub fn prepare_update(
        &self,
        index: i32,
        tick_current: i32,
        liquidity_delta: i128,
        fee_growth_global0_x128: U256,
        fee_growth_global1_x128: U256,
        upper: bool,
    ) -> PoolResult<Tick> {
        let mut tick = match self.get(index) {
            Some(tick) => tick.clone(),
            None if index <= tick_current => {
                Tick::new(index, fee_growth_global0_x128, fee_growth_global1_x128)
            }
            None => Tick::new(index, U256::zero(), U256::zero()),
        };

        tick.liquidity_gross = add_delta(tick.liquidity_gross, liquidity_delta)?;
        tick.liquidity_net = if upper {
            tick.liquidity_net.checked_sub(liquidity_delta)
        } else {
            tick.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or(MathError::Overflow)?;

        Ok(tick)
    }

    /// Writes back a tick produced by [`prepare_update`](Self::prepare_update),
    /// dropping it if no liquidity references it any more.
    pub fn commit(&mut self, tick: Tick) {
        if tick.is_initialized() {
            self.insert(tick);
        } else {
            self.clear_tick(tick.index);
        }
    }

    /// Applies `liquidity_delta` to tick `index` and returns whether its
    /// gross liquidity dropped to zero, in which case the caller is expected
    /// to [`clear_tick`](Self::clear_tick) it.
    ///
    /// # Errors
    /// See [`prepare_update`](Self::prepare_update). The ledger is unchanged
    /// on error.
    pub fn update_tick(
        &mut self,
        index: i32,
        tick_current: i32,
        liquidity_delta: i128,
        fee_growth_global0_x128: U256,
        fee_growth_global1_x128: U256,
        upper: bool,
    ) -> PoolResult<bool> {
        let tick = self.prepare_update(
            index,
            tick_current,
            liquidity_delta,
            fee_growth_global0_x128,
            fee_growth_global1_x128,
            upper,
        )?;
        let cleared = !tick.is_initialized();
        self.insert(tick);
        Ok(cleared)
    }

    /// Removes tick `index`, if present.
    pub fn clear_tick(&mut self, index: i32) {
        if let Ok(position) = self.search(index) {
            self.ticks.remove(position);
        }
    }

    /// Crosses tick `index`, flipping its outside fee growth, and returns
    /// its net liquidity.
    ///
    /// # Errors
    /// [`PoolError::TickNotInitialized`] if the tick is not in the ledger.
    pub fn cross(
        &mut self,
        index: i32,
        fee_growth_global0_x128: U256,
        fee_growth_global1_x128: U256,
    ) -> PoolResult<i128> {
        let position = self
            .search(index)
            .map_err(|_| PoolError::TickNotInitialized(index))?;
        let tick = &mut self.ticks[position];
        tick.flip_outside(fee_growth_global0_x128, fee_growth_global1_x128);
        Ok(tick.liquidity_net)
    }

    /// Finds the next initialized tick at or below (`lte`) or strictly
    /// above `tick`, without leaving the 256-tick word containing the start.
    ///
    /// Returns the word boundary with `false` when the word holds no
    /// initialized tick in that direction. The boundary may lie outside the
    /// valid tick domain.
    #[must_use]
    pub fn next_initialized_tick_within_one_word(&self, tick: i32, lte: bool) -> (i32, bool) {
        let spacing = self.tick_spacing;
        let compressed = tick.div_euclid(spacing);
        let above = self.ticks.partition_point(|t| t.index <= tick);

        if lte {
            let word_start = ((compressed >> WORD_BITS) << WORD_BITS) * spacing;
            match above.checked_sub(1).map(|position| self.ticks[position].index) {
                Some(floor) => {
                    let next = word_start.max(floor);
                    (next, next == floor)
                }
                None => (word_start, false),
            }
        } else {
            let word = (compressed + 1) >> WORD_BITS;
            let word_end = (((word + 1) << WORD_BITS) - 1) * spacing;
            match self.ticks.get(above).map(|t| t.index) {
                Some(ceil) => {
                    let next = word_end.min(ceil);
                    (next, next == ceil)
                }
                None => (word_end, false),
            }
        }
    }

    /// Fee growth per unit of liquidity accrued inside `[lower, upper)`.
    ///
    /// # Errors
    /// [`PoolError::TickNotInitialized`] if either boundary is missing.
    pub fn get_fee_growth_inside(
        &self,
        tick_lower: i32,
        tick_upper: i32,
        tick_current: i32,
        fee_growth_global0_x128: U256,
        fee_growth_global1_x128: U256,
    ) -> PoolResult<(U256, U256)> {
        let lower = self
            .get(tick_lower)
            .ok_or(PoolError::TickNotInitialized(tick_lower))?;
        let upper = self
            .get(tick_upper)
            .ok_or(PoolError::TickNotInitialized(tick_upper))?;
        Ok(fee_growth_inside(
            lower,
            upper,
            tick_current,
            fee_growth_global0_x128,
            fee_growth_global1_x128,
        ))
    }

    fn search(&self, index: i32) -> Result<usize, usize> {
        self.ticks.binary_search_by_key(&index, |tick| tick.index)
    }

    fn insert(&mut self, tick: Tick) {
        match self.search(tick.index) {
            Ok(position) => self.ticks[position] = tick,
            Err(position) => self.ticks.insert(position, tick),
        }
    }
}

/// Fee growth inside the range bounded by `lower` and `upper`:
/// `global - below(lower) - above(upper)`, all modulo 2^256.
#[must_use]
pub fn fee_growth_inside(
    lower: &Tick,
    upper: &Tick,
    tick_current: i32,
    fee_growth_global0_x128: U256,
    fee_growth_global1_x128: U256,
) -> (U256, U256) {
    let (below0, below1) = if tick_current >= lower.index {
        (lower.fee_growth_outside0_x128, lower.fee_growth_outside1_x128)
    } else {
        (
            wrapping_sub(fee_growth_global0_x128, lower.fee_growth_outside0_x128),
            wrapping_sub(fee_growth_global1_x128, lower.fee_growth_outside1_x128),
        )
    };

    let (above0, above1) = if tick_current < upper.index {
        (upper.fee_growth_outside0_x128, upper.fee_growth_outside1_x128)
    } else {
        (
            wrapping_sub(fee_growth_global0_x128, upper.fee_growth_outside0_x128),
            wrapping_sub(fee_growth_global1_x128, upper.fee_growth_outside1_x128),
        )
    };

    (
        wrapping_sub(wrapping_sub(fee_growth_global0_x128, below0), above0),
        wrapping_sub(wrapping_sub(fee_growth_global1_x128, below1), above1),
    )
}

fn wrapping_sub(a: U256, b: U256) -> U256 {
    a.overflowing_sub(b).0
}
