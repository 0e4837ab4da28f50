//! The hook's callback surface
//!
//! Each pool moves from uninitialized to initialized exactly once. Callbacks
//! validate everything they need before touching oracle state, so a returned
//! error leaves the hook as it was.

use super::permissions::{HookCallback, HookPermissions};
use crate::backrun::BackrunExecutor;
use crate::engine::{Caller, PoolEngine};
use crate::errors::HookError;
use ethers_core::types::{Address, U256};
use oracle::{Consultation, Observation, ObservationState, PoolOracle};
use rebound_amm::{BackrunSizer, SizingConfig};
use rebound_config::{ConfigError, HookConfig, OracleSettings};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use types::tick::{is_full_range, MAX_TICK_SPACING};
use types::{BalanceDelta, ModifyLiquidityParams, PoolId, PoolKey, SwapParams};

/// Oracle-backed backrun hook
#[derive(Debug, Clone)]
pub struct BackrunHook {
    address: Address,
    oracles: HashMap<PoolId, PoolOracle>,
    executor: BackrunExecutor,
    oracle_settings: OracleSettings,
}

impl BackrunHook {
    pub fn new(address: Address, config: &HookConfig) -> Result<Self, HookError> {
        config.validate()?;
        let sizer = BackrunSizer::new(config.sizing_config()).map_err(ConfigError::from)?;
        Ok(Self {
            address,
            oracles: HashMap::new(),
            executor: BackrunExecutor::new(sizer),
            oracle_settings: config.oracle.clone(),
        })
    }

    /// Hook with default settings and the given sizing tiers
    pub fn with_sizing(address: Address, sizing: SizingConfig) -> Result<Self, HookError> {
        let mut config = HookConfig::default();
        config.sizing.min_tick_delta = sizing.min_tick_delta;
        config.sizing.limit_tick_delta = sizing.limit_tick_delta;
        config.sizing.tolerance_bps = sizing.tolerance_bps;
        Self::new(address, &config)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn sizing(&self) -> &SizingConfig {
        self.executor.sizer().config()
    }

    pub fn permissions() -> HookPermissions {
        HookPermissions {
            before_initialize: true,
            after_initialize: true,
            before_add_liquidity: true,
            before_remove_liquidity: true,
            before_swap: true,
            after_swap: true,
            after_swap_returns_delta: true,
            ..Default::default()
        }
    }

    pub fn is_initialized(&self, pool: &PoolId) -> bool {
        self.oracles.contains_key(pool)
    }

    fn oracle(&self, pool: &PoolId) -> Result<&PoolOracle, HookError> {
        self.oracles.get(pool).ok_or(HookError::PoolNotInitialized(*pool))
    }

    fn oracle_mut(&mut self, pool: &PoolId) -> Result<&mut PoolOracle, HookError> {
        self.oracles
            .get_mut(pool)
            .ok_or(HookError::PoolNotInitialized(*pool))
    }

    /// Accept only the single canonical configuration per pair
    pub fn before_initialize<E: PoolEngine>(
        &mut self,
        _engine: &mut E,
        caller: &dyn Caller,
        key: &PoolKey,
        _sqrt_price_x96: U256,
    ) -> Result<HookCallback, HookError> {
        if key.fee != 0 || key.tick_spacing != MAX_TICK_SPACING {
            warn!(
                caller = ?caller.address(),
                fee = key.fee,
                tick_spacing = key.tick_spacing,
                "rejected pool configuration"
            );
            return Err(HookError::DuplicatePoolConfiguration {
                fee: key.fee,
                tick_spacing: key.tick_spacing,
                expected_tick_spacing: MAX_TICK_SPACING,
            });
        }
        Ok(HookCallback::BeforeInitialize)
    }

    pub fn after_initialize<E: PoolEngine>(
        &mut self,
        engine: &mut E,
        _caller: &dyn Caller,
        key: &PoolKey,
        _sqrt_price_x96: U256,
        tick: i32,
    ) -> Result<HookCallback, HookError> {
        let pool_id = key.id();
        if self.oracles.contains_key(&pool_id) {
            return Err(HookError::PoolAlreadyInitialized(pool_id));
        }

        let time = engine.block_timestamp();
        let mut oracle = PoolOracle::initialize(time, tick);
        if self.oracle_settings.initial_cardinality_next > 1 {
            oracle.grow(self.oracle_settings.initial_cardinality_next);
        }
        info!(
            pool = ?pool_id,
            time,
            tick,
            cardinality_next = oracle.state().cardinality_next,
            "oracle initialized"
        );
        self.oracles.insert(pool_id, oracle);
        Ok(HookCallback::AfterInitialize)
    }

    pub fn before_add_liquidity<E: PoolEngine>(
        &mut self,
        engine: &mut E,
        caller: &dyn Caller,
        key: &PoolKey,
        params: &ModifyLiquidityParams,
    ) -> Result<HookCallback, HookError> {
        self.record_for_liquidity(engine, caller, key, params)?;
        Ok(HookCallback::BeforeAddLiquidity)
    }

    pub fn before_remove_liquidity<E: PoolEngine>(
        &mut self,
        engine: &mut E,
        caller: &dyn Caller,
        key: &PoolKey,
        params: &ModifyLiquidityParams,
    ) -> Result<HookCallback, HookError> {
        self.record_for_liquidity(engine, caller, key, params)?;
        Ok(HookCallback::BeforeRemoveLiquidity)
    }

    fn record_for_liquidity<E: PoolEngine>(
        &mut self,
        engine: &E,
        caller: &dyn Caller,
        key: &PoolKey,
        params: &ModifyLiquidityParams,
    ) -> Result<(), HookError> {
        if !is_full_range(params.tick_lower, params.tick_upper, MAX_TICK_SPACING) {
            warn!(
                caller = ?caller.address(),
                tick_lower = params.tick_lower,
                tick_upper = params.tick_upper,
                "rejected partial-range position"
            );
            return Err(HookError::NonFullRangePosition {
                tick_lower: params.tick_lower,
                tick_upper: params.tick_upper,
            });
        }
        self.record(engine, key)
    }

    pub fn before_swap<E: PoolEngine>(
        &mut self,
        engine: &mut E,
        caller: &dyn Caller,
        key: &PoolKey,
        params: &SwapParams,
    ) -> Result<HookCallback, HookError> {
        if !params.is_exact_input() {
            warn!(
                caller = ?caller.address(),
                amount_specified = params.amount_specified,
                "rejected exact-output swap"
            );
            return Err(HookError::NotExactInput {
                amount_specified: params.amount_specified,
            });
        }
        self.record(engine, key)?;
        Ok(HookCallback::BeforeSwap)
    }

    /// Run the backrun; the returned amount is the hook's adjustment to the
    /// swapper's unspecified-currency delta
    pub fn after_swap<E: PoolEngine>(
        &mut self,
        engine: &mut E,
        caller: &dyn Caller,
        key: &PoolKey,
        params: &SwapParams,
        delta: BalanceDelta,
    ) -> Result<(HookCallback, i128), HookError> {
        let pool_id = key.id();
        let last_tick = self.oracle(&pool_id)?.latest().prev_tick;
        debug!(
            pool = ?pool_id,
            last_tick,
            amount0 = delta.amount0,
            amount1 = delta.amount1,
            "swap settled"
        );

        let outcome = self
            .executor
            .execute(engine, caller, key, params, last_tick)?;
        Ok((HookCallback::AfterSwap, outcome.hook_delta()))
    }

    /// Write an observation with the engine's current tick and liquidity
    fn record<E: PoolEngine>(&mut self, engine: &E, key: &PoolKey) -> Result<(), HookError> {
        let pool_id = key.id();
        // Read everything before mutating
        self.oracle(&pool_id)?;
        let tick = engine.slot0(&pool_id)?.tick;
        let liquidity = engine.liquidity(&pool_id)?;
        let time = engine.block_timestamp();

        let oracle = self.oracle_mut(&pool_id)?;
        let written = oracle.record(time, tick, liquidity);
        let state = oracle.state();
        debug!(
            pool = ?pool_id,
            time,
            tick,
            liquidity,
            written,
            index = state.index,
            cardinality = state.cardinality,
            "observation recorded"
        );
        Ok(())
    }

    /// Raise the number of observations the pool retains; open to anyone
    pub fn increase_cardinality_next(
        &mut self,
        pool: &PoolId,
        desired: u16,
    ) -> Result<(u16, u16), HookError> {
        let (old, new) = self.oracle_mut(pool)?.grow(desired);
        if new != old {
            info!(pool = ?pool, old, new, "observation capacity increased");
        }
        Ok((old, new))
    }

    pub fn get_observation(&self, pool: &PoolId, index: u16) -> Result<Observation, HookError> {
        Ok(self.oracle(pool)?.observation(index))
    }

    pub fn get_state(&self, pool: &PoolId) -> Result<ObservationState, HookError> {
        Ok(self.oracle(pool)?.state())
    }

    /// Accumulators `seconds_agos` before the engine's current block
    pub fn observe<E: PoolEngine>(
        &self,
        engine: &E,
        pool: &PoolId,
        seconds_agos: &[u32],
    ) -> Result<(Vec<i64>, Vec<U256>), HookError> {
        let oracle = self.oracle(pool)?;
        let tick = engine.slot0(pool)?.tick;
        let liquidity = engine.liquidity(pool)?;
        Ok(oracle.observe(engine.block_timestamp(), seconds_agos, tick, liquidity)?)
    }

    /// Time-weighted averages over the trailing `window` seconds
    pub fn consult<E: PoolEngine>(
        &self,
        engine: &E,
        pool: &PoolId,
        window: u32,
    ) -> Result<Consultation, HookError> {
        let oracle = self.oracle(pool)?;
        let tick = engine.slot0(pool)?.tick;
        let liquidity = engine.liquidity(pool)?;
        Ok(oracle.consult(engine.block_timestamp(), window, tick, liquidity)?)
    }

    /// Time-weighted mean tick over the trailing `window` seconds
    pub fn arithmetic_mean_tick<E: PoolEngine>(
        &self,
        engine: &E,
        pool: &PoolId,
        window: u32,
    ) -> Result<i32, HookError> {
        Ok(self.consult(engine, pool, window)?.arithmetic_mean_tick)
    }
}
