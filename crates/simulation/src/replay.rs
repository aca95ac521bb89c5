//! Replays a recorded transaction log against a pool.
//!
//! In [`ReplayMode::External`] every recorded mint and burn belongs to some
//! other participant and goes through the untracked liquidity path, which
//! is what a backtest of a tracked position needs. [`ReplayMode::Verify`]
//! tracks every mint and burn and cross-checks the realized amounts, price
//! and tick against the values recorded in the log.

use crate::error::{PoolError, ReplayError};
use crate::pool::Pool;
use crate::transaction::{FlashRecord, LiquidityRecord, SwapRecord, Transaction};
use primitive_types::U256;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// How recorded liquidity changes are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplayMode {
    /// Untracked liquidity, no cross-checks.
    #[default]
    External,
    /// Tracked liquidity, recorded outcomes are compared.
    Verify,
}

/// Options for [`replay`].
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub mode: ReplayMode,
    /// Abort on the first rejected transaction instead of skipping it.
    pub stop_on_error: bool,
    /// Audit the pool invariants after every transaction. Always on in
    /// [`ReplayMode::Verify`].
    pub check_invariants: bool,
}

impl ReplayOptions {
    /// Creates options for an external-liquidity replay that skips rejected
    /// transactions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ReplayMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    #[must_use]
    pub fn with_invariant_checks(mut self, check_invariants: bool) -> Self {
        self.check_invariants = check_invariants;
        self
    }
}

/// A recorded value that the replayed pool did not reproduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    pub id: String,
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

/// A transaction the pool rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub id: String,
    pub error: PoolError,
}

/// Counters and findings of a replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub mints: usize,
    pub burns: usize,
    pub swaps: usize,
    pub flashes: usize,
    /// Swap records with no positive amount, which carry nothing to replay.
    pub empty_swaps: usize,
    pub rejected: Vec<Rejection>,
    pub divergences: Vec<Divergence>,
}

impl ReplaySummary {
    /// Number of transactions applied to the pool.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.mints + self.burns + self.swaps + self.flashes
    }

    /// Whether every recorded outcome was reproduced.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.rejected.is_empty() && self.divergences.is_empty()
    }

    fn mark(&self) -> SummaryMark {
        SummaryMark {
            counts: [self.mints, self.burns, self.swaps, self.flashes, self.empty_swaps],
            divergences: self.divergences.len(),
        }
    }

    fn rewind(&mut self, mark: SummaryMark) {
        [self.mints, self.burns, self.swaps, self.flashes, self.empty_swaps] = mark.counts;
        self.divergences.truncate(mark.divergences);
    }
}

/// Counters of a summary before a transaction, for rollback.
#[derive(Clone, Copy)]
struct SummaryMark {
    counts: [usize; 5],
    divergences: usize,
}

/// Applies `transactions` to `pool` in order.
///
/// A rejected transaction leaves the pool as it was. With invariant audits
/// enabled, a transaction after which the pool fails its audit is rolled
/// back from a snapshot taken before it and reported as rejected.
///
/// # Errors
/// [`ReplayError::Transaction`] for the first rejected transaction when
/// `stop_on_error` is set.
pub fn replay(
    pool: &mut Pool,
    transactions: &[Transaction],
    options: &ReplayOptions,
) -> Result<ReplaySummary, ReplayError> {
    info!(
        transactions = transactions.len(),
        mode = ?options.mode,
        "starting replay"
    );
    let mut summary = ReplaySummary::default();
    let audit = options.check_invariants || options.mode == ReplayMode::Verify;

    for transaction in transactions {
        let snapshot = audit.then(|| (pool.clone(), summary.mark()));

        let outcome = apply(pool, transaction, options.mode, &mut summary).and_then(|()| {
            if audit {
                pool.check_invariants()
            } else {
                Ok(())
            }
        });

        if let Err(error) = outcome {
            if let Some((saved, mark)) = snapshot {
                *pool = saved;
                summary.rewind(mark);
            }
            warn!(id = transaction.id(), kind = transaction.kind(), %error, "transaction rejected");
            if options.stop_on_error {
                return Err(ReplayError::Transaction {
                    id: transaction.id().to_string(),
                    source: error,
                });
            }
            summary.rejected.push(Rejection {
                id: transaction.id().to_string(),
                error,
            });
        }
    }

    info!(
        applied = summary.applied(),
        rejected = summary.rejected.len(),
        divergences = summary.divergences.len(),
        sqrt_price = %pool.sqrt_price_x96(),
        tick = pool.tick_current(),
        liquidity = pool.liquidity(),
        "replay finished"
    );
    Ok(summary)
}

/// Applies one transaction, recording counters and divergences.
///
/// # Errors
/// Any [`PoolError`] raised by the pool, which is then unchanged.
pub fn apply(
    pool: &mut Pool,
    transaction: &Transaction,
    mode: ReplayMode,
    summary: &mut ReplaySummary,
) -> Result<(), PoolError> {
    match transaction {
        Transaction::Mint(record) => {
            apply_mint(pool, record, mode, summary)?;
            summary.mints += 1;
        }
        Transaction::Burn(record) => {
            apply_burn(pool, record, mode, summary)?;
            summary.burns += 1;
        }
        Transaction::Swap(record) => {
            if apply_swap(pool, record, mode, summary)? {
                summary.swaps += 1;
            } else {
                summary.empty_swaps += 1;
            }
        }
        Transaction::Flash(FlashRecord {
            amount0, amount1, ..
        }) => {
            pool.flash(*amount0, *amount1)?;
            summary.flashes += 1;
        }
    }
    Ok(())
}

fn apply_mint(
    pool: &mut Pool,
    record: &LiquidityRecord,
    mode: ReplayMode,
    summary: &mut ReplaySummary,
) -> Result<(), PoolError> {
    match mode {
        ReplayMode::External => {
            pool.apply_external_mint(record.tick_lower, record.tick_upper, record.amount)
        }
        ReplayMode::Verify => {
            let (amount0, amount1) = pool.mint(record.tick_lower, record.tick_upper, record.amount)?;
            compare(summary, &record.id, "amount0", record.amount0, amount0);
            compare(summary, &record.id, "amount1", record.amount1, amount1);
            Ok(())
        }
    }
}

fn apply_burn(
    pool: &mut Pool,
    record: &LiquidityRecord,
    mode: ReplayMode,
    summary: &mut ReplaySummary,
) -> Result<(), PoolError> {
    match mode {
        ReplayMode::External => {
            pool.apply_external_burn(record.tick_lower, record.tick_upper, record.amount)
        }
        ReplayMode::Verify => {
            if record.amount == 0 {
                debug!(id = %record.id, "skipping zero burn");
                return Ok(());
            }
            let (amount0, amount1) = pool.burn(record.tick_lower, record.tick_upper, record.amount)?;
            compare(summary, &record.id, "amount0", record.amount0, amount0);
            compare(summary, &record.id, "amount1", record.amount1, amount1);
            Ok(())
        }
    }
}

/// Replays a swap as an exact input of whichever token the pool received.
/// Returns `false` when the record has no positive amount.
fn apply_swap(
    pool: &mut Pool,
    record: &SwapRecord,
    mode: ReplayMode,
    summary: &mut ReplaySummary,
) -> Result<bool, PoolError> {
    let limit = if record.use_x96 {
        record.sqrt_price_x96
    } else {
        U256::zero()
    };

    let result = if record.amount0 > 0 {
        let token = pool.token0().to_string();
        pool.swap_exact_input(record.amount0.unsigned_abs(), &token, limit)?
    } else if record.amount1 > 0 {
        let token = pool.token1().to_string();
        pool.swap_exact_input(record.amount1.unsigned_abs(), &token, limit)?
    } else {
        debug!(id = %record.id, "swap record without input amount");
        return Ok(false);
    };

    if mode == ReplayMode::Verify {
        compare(summary, &record.id, "amount0", record.amount0, result.amount0);
        compare(summary, &record.id, "amount1", record.amount1, result.amount1);
        compare(
            summary,
            &record.id,
            "sqrtPriceX96",
            record.sqrt_price_x96,
            pool.sqrt_price_x96(),
        );
        compare(summary, &record.id, "tick", record.tick, pool.tick_current());
    }
    Ok(true)
}

fn compare<T: PartialEq + Display>(
    summary: &mut ReplaySummary,
    id: &str,
    field: &'static str,
    expected: T,
    actual: T,
) {
    if expected != actual {
        warn!(id, field, %expected, %actual, "replay diverged from record");
        summary.divergences.push(Divergence {
            id: id.to_string(),
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
}
