//! Backrun Sizing Property Tests
//!
//! Properties of the three-tier sizer that must hold for any valid tier
//! configuration and swap size.

use proptest::prelude::*;
use rebound_amm::{BackrunSize, BackrunSizer, SizingConfig, BPS_DENOMINATOR};

prop_compose! {
    fn sizing_config()
        (min in 0u32..500, width in 1u32..2_000, tolerance_bps in 1u32..=BPS_DENOMINATOR)
        -> SizingConfig
    {
        SizingConfig {
            min_tick_delta: min,
            limit_tick_delta: min + width,
            tolerance_bps,
        }
    }
}

proptest! {
    #[test]
    fn prop_size_never_exceeds_swap(
        config in sizing_config(),
        current in -887_272i32..887_272,
        last in -887_272i32..887_272,
        magnitude in any::<u128>(),
    ) {
        let sizer = BackrunSizer::new(config).unwrap();
        let size = sizer.size(current, last, magnitude);
        prop_assert!(size.amount() <= magnitude);
        prop_assert_eq!(size.delta(), BackrunSizer::tick_delta(current, last));
    }

    #[test]
    fn prop_size_is_monotonic_in_deviation(
        config in sizing_config(),
        first in 0i32..3_000,
        second in 0i32..3_000,
        magnitude in 0u128..u64::MAX as u128,
    ) {
        let sizer = BackrunSizer::new(config).unwrap();
        let (low, high) = if first <= second { (first, second) } else { (second, first) };
        let small = sizer.size(low, 0, magnitude).amount();
        let large = sizer.size(high, 0, magnitude).amount();
        prop_assert!(small <= large);
    }

    #[test]
    fn prop_continuous_at_tier_boundaries(
        config in sizing_config(),
        magnitude in 0u128..u64::MAX as u128,
    ) {
        let sizer = BackrunSizer::new(config).unwrap();
        let min = config.min_tick_delta as i32;
        let limit = config.limit_tick_delta as i32;

        prop_assert_eq!(sizer.size(min, 0, magnitude).amount(), 0);

        let full = magnitude * config.tolerance_bps as u128 / BPS_DENOMINATOR as u128;
        prop_assert_eq!(sizer.size(limit, 0, magnitude).amount(), full);
        // approaching the limit from below never overshoots the full size
        prop_assert!(sizer.size(limit - 1, 0, magnitude).amount() <= full);
    }

    #[test]
    fn prop_direction_does_not_matter(
        config in sizing_config(),
        delta in 0i32..5_000,
        magnitude in any::<u64>(),
    ) {
        let sizer = BackrunSizer::new(config).unwrap();
        prop_assert_eq!(
            sizer.size(delta, 0, magnitude as u128),
            sizer.size(-delta, 0, magnitude as u128)
        );
    }

    #[test]
    fn prop_skip_has_zero_amount(
        config in sizing_config(),
        current in -5_000i32..5_000,
        magnitude in any::<u64>(),
    ) {
        let sizer = BackrunSizer::new(config).unwrap();
        let size = sizer.size(current, 0, magnitude as u128);
        if let BackrunSize::Skip { .. } = size {
            prop_assert_eq!(size.amount(), 0);
        } else {
            prop_assert!(size.amount() > 0);
        }
    }
}
