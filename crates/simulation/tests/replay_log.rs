use clmm_sim_simulation::prelude::*;
use primitive_types::U256;
use std::path::PathBuf;

const TRACKED_LOWER: i32 = 190_880;
const TRACKED_UPPER: i32 = 198_880;

fn fixture_pool() -> Pool {
    let sqrt_price = U256::from_dec_str("1350174849792634181862360983626536").unwrap();
    Pool::new("USDC", "WETH", 500, sqrt_price).unwrap()
}

const INLINE_LOG: &str = r#"[
    {"type": "Mint", "id": "0x01", "timestamp": 1620158974, "amount": "2000000000000000",
     "amount0": "0", "amount1": "0", "tickLower": 192000, "tickUpper": 198000},
    {"type": "Mint", "id": "0x02", "timestamp": 1620159000, "amount": "500000000000000",
     "amount0": "0", "amount1": "0", "tickLower": 195000, "tickUpper": 196500},
    {"type": "Swap", "id": "0x03", "timestamp": 1620159100, "amount0": "2500000000",
     "amount1": "-1000000000000000000", "sqrtPriceX96": "0", "tick": 0},
    {"type": "Flash", "id": "0x04", "timestamp": 1620159200, "amount0": "1000000",
     "amount1": "1000000000000"},
    {"type": "Swap", "id": "0x05", "timestamp": 1620159300, "amount0": "-2000000000",
     "amount1": "1500000000000000000", "sqrtPriceX96": "0", "tick": 0},
    {"type": "Burn", "id": "0x06", "timestamp": 1620159400, "amount": "500000000000000",
     "amount0": "0", "amount1": "0", "tickLower": 195000, "tickUpper": 196500},
    {"type": "Swap", "id": "0x07", "timestamp": 1620159500, "amount0": "0",
     "amount1": "0", "sqrtPriceX96": "0", "tick": 0}
]"#;

#[test]
fn test_inline_log_backtest_of_tracked_position() {
    let transactions = parse_transactions(INLINE_LOG).unwrap();
    let mut pool = fixture_pool();

    let (deposited0, deposited1) = pool.mint(TRACKED_LOWER, TRACKED_UPPER, 93_924_580_278).unwrap();
    assert!(deposited0 > 0 && deposited1 > 0);

    let options = ReplayOptions::new()
        .with_invariant_checks(true)
        .with_stop_on_error(true);
    let summary = replay(&mut pool, &transactions, &options).unwrap();

    assert_eq!(summary.mints, 2);
    assert_eq!(summary.burns, 1);
    assert_eq!(summary.swaps, 2);
    assert_eq!(summary.flashes, 1);
    assert_eq!(summary.empty_swaps, 1);
    assert!(summary.is_consistent());

    // Only the tracked range lives in the position book.
    assert_eq!(pool.positions().count(), 1);
    assert!(pool.ticks().get(195_000).is_none());
    assert!(pool.ticks().get(192_000).is_some());

    let fees_before = pool.position(TRACKED_LOWER, TRACKED_UPPER).unwrap().clone();
    assert_eq!(fees_before.tokens_owed0, U256::zero());

    pool.burn(TRACKED_LOWER, TRACKED_UPPER, 93_924_580_278).unwrap();
    let (collected0, collected1) = pool.collect(TRACKED_LOWER, TRACKED_UPPER).unwrap();

    // Both directions traded through the range, so fees accrue on both sides.
    assert!(!collected0.is_zero());
    assert!(!collected1.is_zero());
    assert_eq!(pool.liquidity(), 2_000_000_000_000_000);
    pool.check_invariants().unwrap();
}

#[test]
fn test_inline_log_replays_identically_on_clones() {
    let transactions = parse_transactions(INLINE_LOG).unwrap();
    let base = fixture_pool();

    let mut first = base.clone();
    let mut second = base.clone();
    replay(&mut first, &transactions, &ReplayOptions::new()).unwrap();
    replay(&mut second, &transactions, &ReplayOptions::new()).unwrap();

    assert_eq!(first, second);
    assert_ne!(first.sqrt_price_x96(), base.sqrt_price_x96());
    assert_eq!(base.ticks().len(), 0);
}

fn recorded_log_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/trans.json")
}

#[test]
#[ignore = "requires the recorded transaction log at data/trans.json"]
fn test_recorded_log_fixture() {
    let transactions = read_transactions(recorded_log_path()).unwrap();
    let mut pool = fixture_pool();

    pool.mint(TRACKED_LOWER, TRACKED_UPPER, 93_924_580_278).unwrap();
    replay(&mut pool, &transactions, &ReplayOptions::new()).unwrap();
    pool.burn(TRACKED_LOWER, TRACKED_UPPER, 93_924_580_278).unwrap();
    let (amount0, amount1) = pool.collect(TRACKED_LOWER, TRACKED_UPPER).unwrap();

    assert_eq!(amount0, U256::from(1_053_517u64));
    assert_eq!(amount1, U256::from(275_576_756_661_612u64));
    assert_eq!(pool.liquidity(), 734_329_717_995_335_932);
    assert_eq!(
        pool.sqrt_price_x96(),
        U256::from_dec_str("1337536101591430553762461821094985").unwrap()
    );
}
