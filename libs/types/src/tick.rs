//! Tick and sqrt price bounds
//!
//! The engine owns all price math; these are only the bounds the hook needs to
//! validate positions and to guard its own swaps.

use ethers_core::types::U256;

/// Lowest tick the engine can represent
pub const MIN_TICK: i32 = -887272;
/// Highest tick the engine can represent
pub const MAX_TICK: i32 = 887272;

/// Smallest tick spacing a pool may use
pub const MIN_TICK_SPACING: i32 = 1;
/// Largest tick spacing a pool may use (int16 max)
pub const MAX_TICK_SPACING: i32 = i16::MAX as i32;

/// Sqrt price at `MIN_TICK` as a Q64.96
pub const MIN_SQRT_PRICE: u128 = 4295128739;

/// Sqrt price at `MAX_TICK` as a Q64.96, little-endian 64-bit limbs.
/// Wider than 128 bits, so it cannot be a `u128` constant.
const MAX_SQRT_PRICE_LIMBS: [u64; 4] = [0x5d95_1d52_6398_8d26, 0xefd1_fc6a_5064_8849, 0xfffd_8963, 0];

/// Sqrt price at `MAX_TICK` as a Q64.96
pub fn max_sqrt_price() -> U256 {
    U256(MAX_SQRT_PRICE_LIMBS)
}

/// Sqrt price at `MIN_TICK` widened to `U256`
pub fn min_sqrt_price() -> U256 {
    U256::from(MIN_SQRT_PRICE)
}

/// Lowest initializable tick for the given spacing
///
/// Division truncates toward zero, matching the engine's integer semantics.
pub fn min_usable_tick(tick_spacing: i32) -> i32 {
    (MIN_TICK / tick_spacing) * tick_spacing
}

/// Highest initializable tick for the given spacing
pub fn max_usable_tick(tick_spacing: i32) -> i32 {
    (MAX_TICK / tick_spacing) * tick_spacing
}

/// Whether `[tick_lower, tick_upper]` spans every usable tick for the spacing
pub fn is_full_range(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> bool {
    tick_lower == min_usable_tick(tick_spacing) && tick_upper == max_usable_tick(tick_spacing)
}

/// Price limit that lets a swap run to the end of the curve in its direction
///
/// One unit inside the bound, since the engine rejects limits equal to it.
pub fn extreme_price_limit(zero_for_one: bool) -> U256 {
    if zero_for_one {
        min_sqrt_price() + U256::one()
    } else {
        max_sqrt_price() - U256::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_ticks_for_max_spacing() {
        assert_eq!(min_usable_tick(MAX_TICK_SPACING), -884709);
        assert_eq!(max_usable_tick(MAX_TICK_SPACING), 884709);
        assert!(is_full_range(-884709, 884709, MAX_TICK_SPACING));
        assert!(!is_full_range(-884709, 884708, MAX_TICK_SPACING));
    }

    #[test]
    fn test_usable_ticks_unit_spacing() {
        assert_eq!(min_usable_tick(1), MIN_TICK);
        assert_eq!(max_usable_tick(1), MAX_TICK);
        assert_eq!(min_usable_tick(60), -887220);
    }

    #[test]
    fn test_extreme_price_limits() {
        assert_eq!(extreme_price_limit(true), U256::from(4295128740u64));
        assert_eq!(
            extreme_price_limit(false),
            U256::from_dec_str("1461446703485210103287273052203988822378723970341").unwrap()
        );
        assert_eq!(
            max_sqrt_price(),
            U256::from_dec_str("1461446703485210103287273052203988822378723970342").unwrap()
        );
        assert!(max_sqrt_price() > U256::from(u128::MAX));
    }
}
