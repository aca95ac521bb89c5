//! Recorded pool transactions and their JSON representation.
//!
//! A log is a JSON array of objects discriminated by `type`. Token amounts,
//! liquidity and prices are decimal strings so that 256-bit and negative
//! values survive the round trip; `useX96` is the string `"true"` or
//! `"false"`.
//!
//! ```json
//! {"type": "Swap", "id": "0xab..#12", "timestamp": 1620158974,
//!  "amount0": "-5000000", "amount1": "1530000000000000000",
//!  "sqrtPriceX96": "1350174849792634181862360983626536", "tick": 194878,
//!  "useX96": "true"}
//! ```

use crate::error::ReplayError;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One recorded pool event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Transaction {
    Mint(LiquidityRecord),
    Burn(LiquidityRecord),
    Swap(SwapRecord),
    Flash(FlashRecord),
}

/// A liquidity change on a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityRecord {
    pub id: String,
    pub timestamp: i64,
    #[serde(with = "decimal_string")]
    pub amount: u128,
    /// Token0 paid in (mint) or released (burn).
    #[serde(with = "decimal_string")]
    pub amount0: u128,
    /// Token1 paid in (mint) or released (burn).
    #[serde(with = "decimal_string")]
    pub amount1: u128,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// A swap, with the pool state observed right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRecord {
    pub id: String,
    pub timestamp: i64,
    /// Signed token0 delta of the pool.
    #[serde(with = "decimal_string")]
    pub amount0: i128,
    /// Signed token1 delta of the pool.
    #[serde(with = "decimal_string")]
    pub amount1: i128,
    #[serde(rename = "sqrtPriceX96", with = "decimal_u256")]
    pub sqrt_price_x96: U256,
    #[serde(default)]
    pub tick: i32,
    /// Replay with the recorded price as the swap's price limit.
    #[serde(rename = "useX96", default, with = "decimal_string")]
    pub use_x96: bool,
}

/// A flash loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashRecord {
    pub id: String,
    pub timestamp: i64,
    #[serde(with = "decimal_string")]
    pub amount0: u128,
    #[serde(with = "decimal_string")]
    pub amount1: u128,
}

impl Transaction {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Transaction::Mint(record) | Transaction::Burn(record) => &record.id,
            Transaction::Swap(record) => &record.id,
            Transaction::Flash(record) => &record.id,
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> i64 {
        match self {
            Transaction::Mint(record) | Transaction::Burn(record) => record.timestamp,
            Transaction::Swap(record) => record.timestamp,
            Transaction::Flash(record) => record.timestamp,
        }
    }

    /// The `type` tag of the record.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Transaction::Mint(_) => "Mint",
            Transaction::Burn(_) => "Burn",
            Transaction::Swap(_) => "Swap",
            Transaction::Flash(_) => "Flash",
        }
    }
}

/// Parses a JSON transaction log.
///
/// # Errors
/// [`ReplayError::Parse`] if the input is not a valid log.
pub fn parse_transactions(json: &str) -> Result<Vec<Transaction>, ReplayError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads a JSON transaction log from a file.
///
/// # Errors
/// [`ReplayError::Io`] if the file cannot be opened, [`ReplayError::Parse`]
/// if its content is not a valid log.
pub fn read_transactions(path: impl AsRef<Path>) -> Result<Vec<Transaction>, ReplayError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Values written as strings and parsed with [`std::str::FromStr`].
mod decimal_string {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.trim().parse().map_err(de::Error::custom)
    }
}

/// 256-bit integers as base-10 strings (`U256::from_str` expects hex).
mod decimal_u256 {
    use primitive_types::U256;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        U256::from_dec_str(raw.trim()).map_err(|err| de::Error::custom(format!("{err:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = r#"[
        {"type": "Mint", "id": "m1", "timestamp": 100, "amount": "93924580278",
         "amount0": "1000", "amount1": "2000", "tickLower": 190880, "tickUpper": 198880},
        {"type": "Swap", "id": "s1", "timestamp": 101, "amount0": "-5000000",
         "amount1": "1530000000000000000",
         "sqrtPriceX96": "1350174849792634181862360983626536", "tick": 194878,
         "useX96": "true"},
        {"type": "Swap", "id": "s2", "timestamp": 102, "amount0": "7",
         "amount1": "-3", "sqrtPriceX96": "79228162514264337593543950336"},
        {"type": "Flash", "id": "f1", "timestamp": 103, "amount0": "10", "amount1": "0"},
        {"type": "Burn", "id": "b1", "timestamp": 104, "amount": "1",
         "amount0": "0", "amount1": "0", "tickLower": -10, "tickUpper": 10}
    ]"#;

    #[test]
    fn test_parse_log() {
        let transactions = parse_transactions(LOG).unwrap();
        assert_eq!(transactions.len(), 5);

        match &transactions[0] {
            Transaction::Mint(record) => {
                assert_eq!(record.amount, 93_924_580_278);
                assert_eq!(record.tick_lower, 190_880);
                assert_eq!(record.tick_upper, 198_880);
            }
            other => panic!("unexpected record {other:?}"),
        }
        match &transactions[1] {
            Transaction::Swap(record) => {
                assert_eq!(record.amount0, -5_000_000);
                assert_eq!(record.amount1, 1_530_000_000_000_000_000);
                assert_eq!(
                    record.sqrt_price_x96,
                    U256::from_dec_str("1350174849792634181862360983626536").unwrap()
                );
                assert_eq!(record.tick, 194_878);
                assert!(record.use_x96);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn test_optional_swap_fields_default() {
        let transactions = parse_transactions(LOG).unwrap();
        match &transactions[2] {
            Transaction::Swap(record) => {
                assert_eq!(record.tick, 0);
                assert!(!record.use_x96);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn test_accessors() {
        let transactions = parse_transactions(LOG).unwrap();
        let kinds: Vec<&str> = transactions.iter().map(Transaction::kind).collect();
        assert_eq!(kinds, vec!["Mint", "Swap", "Swap", "Flash", "Burn"]);
        assert_eq!(transactions[3].id(), "f1");
        assert_eq!(transactions[4].timestamp(), 104);
    }

    #[test]
    fn test_serialized_form_uses_strings() {
        let transactions = parse_transactions(LOG).unwrap();
        let json = serde_json::to_value(&transactions[1]).unwrap();

        assert_eq!(json["type"], "Swap");
        assert_eq!(json["amount0"], "-5000000");
        assert_eq!(json["sqrtPriceX96"], "1350174849792634181862360983626536");
        assert_eq!(json["useX96"], "true");

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, transactions[1]);
    }

    #[test]
    fn test_rejects_malformed_amounts() {
        let bad = r#"[{"type": "Flash", "id": "f", "timestamp": 1, "amount0": "1.5", "amount1": "0"}]"#;
        assert!(matches!(parse_transactions(bad), Err(ReplayError::Parse(_))));

        let unknown = r#"[{"type": "Collect", "id": "c", "timestamp": 1}]"#;
        assert!(parse_transactions(unknown).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_transactions("does/not/exist.json"),
            Err(ReplayError::Io(_))
        ));
    }
}
