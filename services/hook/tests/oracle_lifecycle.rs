//! Observation recording and queries through the hook

mod common;

use common::*;
use ethers_core::types::U256;
use oracle::ObservationError;
use rebound_config::HookConfig;
use rebound_hook::HookError;

#[test]
fn test_initialize_creates_single_observation() {
    let h = Harness::new();
    let state = h.hook.get_state(&h.pool).unwrap();
    assert_eq!((state.index, state.cardinality, state.cardinality_next), (0, 1, 1));

    let first = h.hook.get_observation(&h.pool, 0).unwrap();
    assert!(first.initialized);
    assert_eq!(first.timestamp, START_TIME);
    assert_eq!(first.tick_cumulative, 0);
    assert_eq!(first.seconds_per_liquidity_cumulative_x128, U256::zero());
    assert_eq!(first.prev_tick, 0);
}

#[test]
fn test_liquidity_write_then_grow() {
    let mut h = Harness::new();
    let router = h.router.clone();

    h.engine.advance(2);
    h.engine
        .modify_liquidity(&mut h.hook, &router, &h.key, &full_range(1))
        .unwrap();
    let written = h.hook.get_observation(&h.pool, 0).unwrap();
    assert_eq!(written.timestamp, START_TIME + 2);
    assert_eq!(written.tick_cumulative, 0);
    assert_eq!(
        written.seconds_per_liquidity_cumulative_x128,
        (U256::from(2) << 128) / U256::from(LIQUIDITY)
    );

    assert_eq!(h.hook.increase_cardinality_next(&h.pool, 2), Ok((1, 2)));

    h.engine.advance(1);
    h.engine
        .modify_liquidity(&mut h.hook, &router, &h.key, &full_range(-1))
        .unwrap();
    let state = h.hook.get_state(&h.pool).unwrap();
    assert_eq!((state.index, state.cardinality, state.cardinality_next), (1, 2, 2));

    // slot 0 survives and is reachable one second back
    assert_eq!(h.hook.get_observation(&h.pool, 0).unwrap(), written);
    let (ticks, spls) = h.hook.observe(&h.engine, &h.pool, &[1]).unwrap();
    assert_eq!(ticks, vec![written.tick_cumulative]);
    assert_eq!(spls, vec![written.seconds_per_liquidity_cumulative_x128]);
}

#[test]
fn test_same_timestamp_write_is_noop() {
    let mut h = Harness::new();
    let router = h.router.clone();
    h.hook.increase_cardinality_next(&h.pool, 4).unwrap();
    h.engine.advance(10);
    h.engine
        .modify_liquidity(&mut h.hook, &router, &h.key, &full_range(5))
        .unwrap();
    let state = h.hook.get_state(&h.pool).unwrap();
    let latest = h.hook.get_observation(&h.pool, state.index).unwrap();

    h.engine
        .modify_liquidity(&mut h.hook, &router, &h.key, &full_range(-5))
        .unwrap();
    h.engine
        .process_swap(&mut h.hook, &router, &h.key, &exact_input(true, 10_000))
        .unwrap();

    assert_eq!(h.hook.get_state(&h.pool).unwrap(), state);
    assert_eq!(h.hook.get_observation(&h.pool, state.index).unwrap(), latest);
}

#[test]
fn test_twap_over_swaps() {
    let mut h = Harness::new();
    let router = h.router.clone();
    h.hook.increase_cardinality_next(&h.pool, 10).unwrap();

    h.engine.advance(10);
    // five ticks down, under the backrun threshold
    h.engine
        .process_swap(&mut h.hook, &router, &h.key, &exact_input(true, 50_000))
        .unwrap();
    assert_eq!(h.tick(), -5);

    let (now, _) = h.hook.observe(&h.engine, &h.pool, &[0]).unwrap();
    let state = h.hook.get_state(&h.pool).unwrap();
    assert_eq!(
        now[0],
        h.hook.get_observation(&h.pool, state.index).unwrap().tick_cumulative
    );

    h.engine.advance(10);
    // 10s at tick 0 then 10s at tick -5: -50 / 20 rounds down to -3
    assert_eq!(h.hook.arithmetic_mean_tick(&h.engine, &h.pool, 20), Ok(-3));
    assert_eq!(h.hook.arithmetic_mean_tick(&h.engine, &h.pool, 10), Ok(-5));

    let consultation = h.hook.consult(&h.engine, &h.pool, 20).unwrap();
    assert!(consultation.harmonic_mean_liquidity.abs_diff(LIQUIDITY) <= 1);
}

#[test]
fn test_queries_beyond_history_fail() {
    let mut h = Harness::new();
    h.engine.advance(20);

    assert!(matches!(
        h.hook.observe(&h.engine, &h.pool, &[21]),
        Err(HookError::Observation(ObservationError::OutOfRange { .. }))
    ));
    assert_eq!(
        h.hook.arithmetic_mean_tick(&h.engine, &h.pool, 0),
        Err(HookError::Observation(ObservationError::ZeroWindow))
    );
    // exactly back to initialization is answerable
    assert!(h.hook.observe(&h.engine, &h.pool, &[20]).is_ok());
}

#[test]
fn test_buffer_wraps_at_capacity() {
    let mut h = Harness::new();
    let router = h.router.clone();
    h.hook.increase_cardinality_next(&h.pool, 3).unwrap();

    for _ in 0..5 {
        h.engine.advance(4);
        h.engine
            .modify_liquidity(&mut h.hook, &router, &h.key, &full_range(1))
            .unwrap();
    }

    let state = h.hook.get_state(&h.pool).unwrap();
    assert_eq!(state.cardinality, 3);
    assert_eq!(state.index, 5 % 3);
    // three live slots: t=13, 17, 21; t=9 has been overwritten
    let oldest = h.hook.get_observation(&h.pool, (state.index + 1) % 3).unwrap();
    assert_eq!(oldest.timestamp, 13);
    assert!(h.hook.observe(&h.engine, &h.pool, &[8]).is_ok());
    assert!(h.hook.observe(&h.engine, &h.pool, &[9]).is_err());
}

#[test]
fn test_initial_cardinality_setting_applies_to_new_pools() {
    let mut config = HookConfig::default();
    config.oracle.initial_cardinality_next = 16;
    let h = Harness::with_config(&config);

    let state = h.hook.get_state(&h.pool).unwrap();
    assert_eq!(state.cardinality_next, 16);
    assert_eq!(state.cardinality, 1);
}
