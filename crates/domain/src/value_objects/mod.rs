pub mod fee_tier;
pub mod price;

pub use fee_tier::FeeTier;
pub use price::Price;
