//! Command Line Interface for the CLMM pool simulator.
use anyhow::{Context, Result, bail};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use clmm_sim_domain::math::tick_math::floor_to_spacing;
use clmm_sim_domain::math::tick_math::{MAX_TICK, MIN_TICK};
use clmm_sim_domain::value_objects::price::Price;
use clmm_sim_simulation::prelude::*;
use dotenv::dotenv;
use prettytable::{Table, row};
use primitive_types::U256;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "clmm-sim")]
#[command(about = "Concentrated liquidity pool simulator CLI", long_about = None)]
struct Cli {
    /// Recorded transaction log (JSON array)
    #[arg(long, env = "CLMM_SIM_TRANSACTIONS", default_value = "data/trans.json", global = true)]
    transactions: PathBuf,

    /// Symbol of token0
    #[arg(long, default_value = "USDC", global = true)]
    token0: String,

    /// Symbol of token1
    #[arg(long, default_value = "WETH", global = true)]
    token1: String,

    /// Decimals of token0, for the reported price
    #[arg(long, default_value_t = 6, global = true)]
    decimals0: u8,

    /// Decimals of token1, for the reported price
    #[arg(long, default_value_t = 18, global = true)]
    decimals1: u8,

    /// Pool fee in hundredths of a bip (500, 3000 or 10000)
    #[arg(long, default_value_t = 500, global = true)]
    fee: u32,

    /// Initial Q64.96 square-root price
    #[arg(
        long,
        default_value = "1350174849792634181862360983626536",
        value_parser = parse_u256,
        global = true
    )]
    sqrt_price: U256,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the log and print the final pool state
    Replay {
        /// Track every mint and burn and compare outcomes with the log
        #[arg(long)]
        verify: bool,

        /// Audit the pool invariants after every transaction
        #[arg(long)]
        check_invariants: bool,

        /// Abort on the first rejected transaction
        #[arg(long)]
        stop_on_error: bool,
    },
    /// Backtest one position over the log
    Position {
        /// Lower tick of the range
        #[arg(long, allow_hyphen_values = true)]
        lower: i32,

        /// Upper tick of the range
        #[arg(long, allow_hyphen_values = true)]
        upper: i32,

        /// Liquidity to provide
        #[arg(long)]
        liquidity: u128,
    },
    /// Backtest ranges of several widths centered on the starting tick
    Sweep {
        /// Half-widths of the ranges, in ticks
        #[arg(long, value_delimiter = ',', default_value = "500,1000,2000,4000,8000")]
        widths: Vec<i32>,

        /// Liquidity provided by every range
        #[arg(long)]
        liquidity: u128,
    },
}

/// Outcome of one position backtest.
struct PositionOutcome {
    lower: i32,
    upper: i32,
    deposited: (u128, u128),
    withdrawn: (u128, u128),
    collected: (U256, U256),
}

fn parse_u256(value: &str) -> Result<U256, String> {
    U256::from_dec_str(value).map_err(|e| format!("invalid unsigned integer {value}: {e:?}"))
}

/// Mints a tracked position, replays the log as external liquidity, then
/// burns the position and collects everything it is owed.
fn backtest_position(
    mut pool: Pool,
    transactions: &[Transaction],
    lower: i32,
    upper: i32,
    liquidity: u128,
) -> Result<PositionOutcome> {
    let deposited = pool
        .mint(lower, upper, liquidity)
        .with_context(|| format!("minting [{lower}, {upper}]"))?;
    replay(&mut pool, transactions, &ReplayOptions::new())?;
    let withdrawn = pool.burn(lower, upper, liquidity)?;
    let collected = pool.collect(lower, upper)?;

    Ok(PositionOutcome {
        lower,
        upper,
        deposited,
        withdrawn,
        collected,
    })
}

fn print_pool(pool: &Pool, decimals0: u8, decimals1: u8) {
    println!("Sqrt Price X96:  {}", pool.sqrt_price_x96());
    println!("Tick:            {}", pool.tick_current());
    println!("Liquidity:       {}", pool.liquidity());
    println!("Initialized:     {} ticks", pool.ticks().len());
    match Price::from_sqrt_price_x96(pool.sqrt_price_x96(), decimals0, decimals1) {
        Some(price) => {
            println!(
                "Price:           {:.8} {} per {}",
                price.value,
                pool.token1(),
                pool.token0()
            );
            println!(
                "                 {:.4} {} per {}",
                price.invert().value,
                pool.token0(),
                pool.token1()
            );
        }
        None => println!("Price:           out of decimal range"),
    }
}

fn print_span(transactions: &[Transaction]) {
    let (Some(first), Some(last)) = (transactions.first(), transactions.last()) else {
        return;
    };
    let format = |timestamp: i64| {
        DateTime::from_timestamp(timestamp, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| timestamp.to_string())
    };
    println!(
        "📅 Log spans {} to {}",
        format(first.timestamp()),
        format(last.timestamp())
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    println!("📂 Loading transactions from {}...", cli.transactions.display());
    let transactions = read_transactions(&cli.transactions)
        .with_context(|| format!("reading {}", cli.transactions.display()))?;
    println!("✅ Loaded {} transactions", transactions.len());
    print_span(&transactions);

    let pool = Pool::new(&cli.token0, &cli.token1, cli.fee, cli.sqrt_price)?;
    info!(
        fee = cli.fee,
        tick = pool.tick_current(),
        "initialized pool"
    );

    match &cli.command {
        Commands::Replay {
            verify,
            check_invariants,
            stop_on_error,
        } => {
            let mode = if *verify {
                ReplayMode::Verify
            } else {
                ReplayMode::External
            };
            let options = ReplayOptions::new()
                .with_mode(mode)
                .with_invariant_checks(*check_invariants)
                .with_stop_on_error(*stop_on_error);

            let mut pool = pool;
            println!("🚀 Replaying {} transactions...", transactions.len());
            let summary = replay(&mut pool, &transactions, &options)?;

            println!("\n📊 Replay Results");
            println!("════════════════════════════════════");
            println!("Mints:           {}", summary.mints);
            println!("Burns:           {}", summary.burns);
            println!("Swaps:           {}", summary.swaps);
            println!("Flashes:         {}", summary.flashes);
            println!("Empty swaps:     {}", summary.empty_swaps);
            println!("Rejected:        {}", summary.rejected.len());
            println!("Divergences:     {}", summary.divergences.len());
            println!("────────────────────────────────────");
            print_pool(&pool, cli.decimals0, cli.decimals1);
            println!("════════════════════════════════════");

            for rejection in summary.rejected.iter().take(10) {
                println!("❌ {}: {}", rejection.id, rejection.error);
            }
            for divergence in summary.divergences.iter().take(10) {
                println!(
                    "⚠️  {} {}: expected {}, got {}",
                    divergence.id, divergence.field, divergence.expected, divergence.actual
                );
            }
        }
        Commands::Position {
            lower,
            upper,
            liquidity,
        } => {
            println!("🚀 Backtesting [{lower}, {upper}] with liquidity {liquidity}...");
            let outcome = backtest_position(pool, &transactions, *lower, *upper, *liquidity)?;

            println!("\n📊 Position Results");
            println!("════════════════════════════════════");
            println!("Range:           [{}, {}]", outcome.lower, outcome.upper);
            println!(
                "Deposited:       {} {} / {} {}",
                outcome.deposited.0, cli.token0, outcome.deposited.1, cli.token1
            );
            println!(
                "Withdrawn:       {} {} / {} {}",
                outcome.withdrawn.0, cli.token0, outcome.withdrawn.1, cli.token1
            );
            println!(
                "Collected:       {} {} / {} {}",
                outcome.collected.0, cli.token0, outcome.collected.1, cli.token1
            );
            println!("════════════════════════════════════");
        }
        Commands::Sweep { widths, liquidity } => {
            if widths.iter().any(|w| *w <= 0) {
                bail!("widths must be positive");
            }
            let spacing = pool.tick_spacing();
            let center = pool.tick_current();
            let transactions = Arc::new(transactions);

            println!("🚀 Sweeping {} ranges around tick {center}...", widths.len());
            let mut handles = Vec::with_capacity(widths.len());
            for width in widths {
                let lower = floor_to_spacing(center.saturating_sub(*width), spacing).max(
                    floor_to_spacing(MIN_TICK, spacing) + spacing,
                );
                let upper = floor_to_spacing(center.saturating_add(*width), spacing).min(
                    floor_to_spacing(MAX_TICK, spacing),
                );
                let pool = pool.clone();
                let transactions = Arc::clone(&transactions);
                let liquidity = *liquidity;
                handles.push(tokio::task::spawn_blocking(move || {
                    backtest_position(pool, &transactions, lower, upper, liquidity)
                }));
            }

            let mut table = Table::new();
            table.add_row(row![
                "Lower", "Upper", "Deposit 0", "Deposit 1", "Collected 0", "Collected 1"
            ]);
            for handle in handles {
                let outcome = handle.await??;
                table.add_row(row![
                    outcome.lower,
                    outcome.upper,
                    outcome.deposited.0,
                    outcome.deposited.1,
                    outcome.collected.0,
                    outcome.collected.1
                ]);
            }

            println!("\n📊 Sweep Results");
            table.printstd();
        }
    }

    Ok(())
}
