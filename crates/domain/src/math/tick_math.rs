//! Conversions between ticks and Q64.96 square root prices.
//!
//! Every tick's square root price is computed once, on first use, into a
//! table indexed by `tick - MIN_TICK`. Forward lookups are O(1) and reverse
//! lookups are a binary search over the (strictly increasing) table.

use crate::error::MathError;
use crate::math::Q128;
use primitive_types::U256;
use std::sync::LazyLock;

/// The minimum tick usable on any pool.
pub const MIN_TICK: i32 = -887_272;

/// The maximum tick usable on any pool.
pub const MAX_TICK: i32 = -MIN_TICK;

/// Square root price at [`MIN_TICK`].
pub const MIN_SQRT_RATIO: U256 = U256([4_295_128_739, 0, 0, 0]);

/// Square root price at [`MAX_TICK`]; itself excluded from the valid price range.
pub const MAX_SQRT_RATIO: U256 = U256([
    0x5d95_1d52_6398_8d26,
    0xefd1_fc6a_5064_8849,
    0xfffd_8963,
    0,
]);

/// `sqrt(1.0001)^-1` in Q128, the starting ratio for odd ticks.
const ODD_TICK_RATIO: u128 = 0xfffc_b933_bd6f_ad37_aa2d_162d_1a59_4001;

/// `sqrt(1.0001)^-(2^i)` in Q128 for `i` in `1..=19`.
const BIT_RATIOS: [u128; 19] = [
    0xfff9_7272_373d_4132_59a4_6990_580e_213a,
    0xfff2_e50f_5f65_6932_ef12_357c_f3c7_fdcc,
    0xffe5_caca_7e10_e4e6_1c36_24ea_a094_1cd0,
    0xffcb_9843_d60f_6159_c9db_5883_5c92_6644,
    0xff97_3b41_fa98_c081_472e_6896_dfb2_54c0,
    0xff2e_a164_66c9_6a38_43ec_78b3_26b5_2861,
    0xfe5d_ee04_6a99_a2a8_11c4_61f1_969c_3053,
    0xfcbe_86c7_900a_88ae_dcff_c83b_479a_a3a4,
    0xf987_a725_3ac4_1317_6f2b_074c_f781_5e54,
    0xf339_2b08_22b7_0005_940c_7a39_8e4b_70f3,
    0xe715_9475_a2c2_9b74_43b2_9c7f_a6e8_89d9,
    0xd097_f3bd_fd20_22b8_845a_d8f7_92aa_5825,
    0xa9f7_4646_2d87_0fdf_8a65_dc1f_90e0_61e5,
    0x70d8_69a1_56d2_a1b8_90bb_3df6_2baf_32f7,
    0x31be_135f_97d0_8fd9_8123_1505_542f_cfa6,
    0x09aa_508b_5b7a_84e1_c677_de54_f3e9_9bc9,
    0x005d_6af8_dedb_8119_6699_c329_225e_e604,
    0x0000_2216_e584_f5fa_1ea9_2604_1bed_fe98,
    0x0000_0000_048a_1703_91f7_dc42_444e_8fa2,
];

static SQRT_RATIO_TABLE: LazyLock<Box<[U256]>> =
    LazyLock::new(|| (MIN_TICK..=MAX_TICK).map(compute_sqrt_ratio_at_tick).collect());

/// Forces construction of the tick table.
///
/// Lookups build it lazily anyway; calling this up front keeps the one-off
/// cost out of the first swap.
pub fn precompute() {
    LazyLock::force(&SQRT_RATIO_TABLE);
}

/// Returns `sqrt(1.0001^tick) * 2^96`.
///
/// # Errors
/// [`MathError::TickOutOfBounds`] if `tick` is outside `[MIN_TICK, MAX_TICK]`.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, MathError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::TickOutOfBounds(tick));
    }
    Ok(SQRT_RATIO_TABLE[(tick - MIN_TICK) as usize])
}

/// Returns the greatest tick whose square root price is less than or equal
/// to `sqrt_price_x96`.
///
/// # Errors
/// [`MathError::SqrtPriceOutOfBounds`] if the price is outside
/// `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`.
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, MathError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(MathError::SqrtPriceOutOfBounds(sqrt_price_x96));
    }
    // table[0] == MIN_SQRT_RATIO, so the partition point is at least 1
    let above = SQRT_RATIO_TABLE.partition_point(|ratio| *ratio <= sqrt_price_x96);
    Ok(MIN_TICK + above as i32 - 1)
}

fn compute_sqrt_ratio_at_tick(tick: i32) -> U256 {
    let abs_tick = tick.unsigned_abs();
    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(ODD_TICK_RATIO)
    } else {
        Q128
    };
    for (i, magic) in BIT_RATIOS.iter().enumerate() {
        if abs_tick & (0x2 << i) != 0 {
            ratio = (ratio * U256::from(*magic)) >> 128usize;
        }
    }
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128 -> Q96, rounding up so that get_tick_at_sqrt_ratio(result) == tick
    if ratio.low_u32() != 0 {
        (ratio >> 32usize) + U256::one()
    } else {
        ratio >> 32usize
    }
}

/// Rounds `tick` to the nearest multiple of `spacing`, halves away from zero.
#[must_use]
pub fn round_to_spacing(tick: i32, spacing: i32) -> i32 {
    let floor = floor_to_spacing(tick, spacing);
    let twice_rem = 2 * (tick - floor);
    if twice_rem > spacing || (twice_rem == spacing && tick >= 0) {
        floor + spacing
    } else {
        floor
    }
}

/// Rounds `tick` up to a multiple of `spacing`.
#[must_use]
pub fn ceil_to_spacing(tick: i32, spacing: i32) -> i32 {
    let floor = floor_to_spacing(tick, spacing);
    if floor == tick { floor } else { floor + spacing }
}

/// Rounds `tick` down to a multiple of `spacing`.
#[must_use]
pub fn floor_to_spacing(tick: i32, spacing: i32) -> i32 {
    tick.div_euclid(spacing) * spacing
}
