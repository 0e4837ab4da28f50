//! In-memory pool manager for tests
//!
//! Sequences hook callbacks the way the host engine does and keeps a ledger of
//! per-account currency deltas, so tests can check that every account the hook
//! touches nets out. Prices are a fixed ratio per pool and each swap moves the
//! tick by its input size divided by a per-pool step; enough to drive the hook
//! deterministically without reimplementing concentrated-liquidity math.
//!
//! Every driver call runs as a transaction: if the hook returns an error, both
//! the manager and the hook are restored to their state before the call.

use crate::coordinator::BackrunHook;
use crate::engine::{Caller, CreditLedger, PoolEngine, SettlementCallback, Slot0};
use crate::errors::{CapabilityError, EngineError, HookError};
use ethers_core::types::{Address, U256};
use std::collections::HashMap;
use types::tick::{max_sqrt_price, min_sqrt_price, MAX_TICK, MIN_TICK};
use types::{BalanceDelta, Currency, ModifyLiquidityParams, PoolId, PoolKey, SwapParams};

/// Pool state held by the mock
#[derive(Debug, Clone)]
pub struct MockPool {
    pub key: PoolKey,
    pub slot0: Slot0,
    pub liquidity: u128,
    /// Price as currency1 per currency0, `(numerator, denominator)`
    pub price: (u128, u128),
    /// Input amount that moves the tick by one
    pub units_per_tick: u128,
}

/// Ways a test can make the manager mishandle the settlement callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementFault {
    /// Return from the swap without invoking the callback
    Skip,
    /// Invoke the callback twice
    InvokeTwice,
}

#[derive(Debug, Clone)]
pub struct MockPoolManager {
    hook: Address,
    pools: HashMap<PoolId, MockPool>,
    deltas: HashMap<(Address, Currency), i128>,
    claims: HashMap<(Address, Currency), u128>,
    timestamp: u32,
    default_units_per_tick: u128,
    fault: Option<SettlementFault>,
}

impl MockPoolManager {
    /// Manager whose nested swaps and mints are attributed to `hook`
    pub fn new(hook: Address, timestamp: u32) -> Self {
        Self {
            hook,
            pools: HashMap::new(),
            deltas: HashMap::new(),
            claims: HashMap::new(),
            timestamp,
            default_units_per_tick: 10_000,
            fault: None,
        }
    }

    pub fn set_timestamp(&mut self, timestamp: u32) {
        self.timestamp = timestamp;
    }

    pub fn advance(&mut self, seconds: u32) {
        self.timestamp = self.timestamp.wrapping_add(seconds);
    }

    /// Step used for pools initialized after this call
    pub fn set_default_units_per_tick(&mut self, units: u128) {
        self.default_units_per_tick = units.max(1);
    }

    pub fn inject_settlement_fault(&mut self, fault: SettlementFault) {
        self.fault = Some(fault);
    }

    pub fn pool(&self, pool: &PoolId) -> Option<&MockPool> {
        self.pools.get(pool)
    }

    pub fn pool_mut(&mut self, pool: &PoolId) -> Option<&mut MockPool> {
        self.pools.get_mut(pool)
    }

    /// Outstanding delta of `account` in `currency`; positive is owed to it
    pub fn delta_of(&self, account: Address, currency: Currency) -> i128 {
        self.deltas.get(&(account, currency)).copied().unwrap_or(0)
    }

    /// Claims minted to `account`
    pub fn claims_of(&self, account: Address, currency: Currency) -> u128 {
        self.claims.get(&(account, currency)).copied().unwrap_or(0)
    }

    /// Whether `account` owes and is owed nothing
    pub fn is_settled(&self, account: Address) -> bool {
        self.deltas
            .iter()
            .filter(|((owner, _), _)| *owner == account)
            .all(|(_, delta)| *delta == 0)
    }

    fn account(&mut self, owner: Address, currency: Currency, amount: i128) {
        *self.deltas.entry((owner, currency)).or_insert(0) += amount;
    }

    fn account_delta(&mut self, owner: Address, key: &PoolKey, delta: BalanceDelta) {
        self.account(owner, key.currency0, delta.amount0);
        self.account(owner, key.currency1, delta.amount1);
    }

    fn transact<T>(
        &mut self,
        hook: &mut BackrunHook,
        body: impl FnOnce(&mut Self, &mut BackrunHook) -> Result<T, HookError>,
    ) -> Result<T, HookError> {
        let engine_checkpoint = self.clone();
        let hook_checkpoint = hook.clone();
        let result = body(self, hook);
        if result.is_err() {
            *self = engine_checkpoint;
            *hook = hook_checkpoint;
        }
        result
    }

    fn check_hook(&self, hook: &BackrunHook, key: &PoolKey) -> Result<(), HookError> {
        if key.hooks != hook.address() || hook.address() != self.hook {
            return Err(EngineError::Rejected(format!(
                "pool hook {:?} is not the registered hook",
                key.hooks
            ))
            .into());
        }
        Ok(())
    }

    /// Create a pool, running the initialize callbacks
    pub fn initialize_pool(
        &mut self,
        hook: &mut BackrunHook,
        caller: &dyn Caller,
        key: &PoolKey,
        sqrt_price_x96: U256,
        tick: i32,
    ) -> Result<PoolId, HookError> {
        self.transact(hook, |engine, hook| {
            engine.check_hook(hook, key)?;
            let pool_id = key.id();
            if engine.pools.contains_key(&pool_id) {
                return Err(EngineError::Rejected("pool already initialized".to_string()).into());
            }

            hook.before_initialize(engine, caller, key, sqrt_price_x96)?;
            engine.pools.insert(
                pool_id,
                MockPool {
                    key: *key,
                    slot0: Slot0 {
                        sqrt_price_x96,
                        tick,
                    },
                    liquidity: 0,
                    price: (1, 1),
                    units_per_tick: engine.default_units_per_tick,
                },
            );
            hook.after_initialize(engine, caller, key, sqrt_price_x96, tick)?;
            Ok(pool_id)
        })
    }

    /// Add or remove liquidity, running the matching before-callback
    pub fn modify_liquidity(
        &mut self,
        hook: &mut BackrunHook,
        caller: &dyn Caller,
        key: &PoolKey,
        params: &ModifyLiquidityParams,
    ) -> Result<(), HookError> {
        self.transact(hook, |engine, hook| {
            engine.check_hook(hook, key)?;
            let pool_id = key.id();
            if params.liquidity_delta >= 0 {
                hook.before_add_liquidity(engine, caller, key, params)?;
            } else {
                hook.before_remove_liquidity(engine, caller, key, params)?;
            }

            let pool = engine
                .pools
                .get_mut(&pool_id)
                .ok_or(EngineError::PoolNotFound(pool_id))?;
            let updated = i128::try_from(pool.liquidity)
                .ok()
                .and_then(|current| current.checked_add(params.liquidity_delta))
                .and_then(|updated| u128::try_from(updated).ok())
                .ok_or_else(|| EngineError::Rejected("liquidity underflow".to_string()))?;
            pool.liquidity = updated;
            Ok(())
        })
    }

    /// Swap for `caller`, running the swap callbacks; returns the caller's delta
    pub fn process_swap(
        &mut self,
        hook: &mut BackrunHook,
        caller: &dyn Caller,
        key: &PoolKey,
        params: &SwapParams,
    ) -> Result<BalanceDelta, HookError> {
        self.transact(hook, |engine, hook| {
            engine.check_hook(hook, key)?;
            hook.before_swap(engine, caller, key, params)?;

            let swap_delta = engine.price_swap(key, params)?;
            let (_, hook_delta) = hook.after_swap(engine, caller, key, params, swap_delta)?;

            // The hook's adjustment comes out of the caller's unspecified leg
            let unspecified_is_0 = !params.specified_is_currency0();
            let hook_balance = if unspecified_is_0 {
                BalanceDelta::new(hook_delta, 0)
            } else {
                BalanceDelta::new(0, hook_delta)
            };
            let caller_delta = swap_delta - hook_balance;

            engine.account_delta(caller.address(), key, caller_delta);
            engine.account_delta(engine.hook, key, hook_balance);
            Ok(caller_delta)
        })
    }

    /// Price the swap and move the tick; returns the swapper's delta
    fn price_swap(&mut self, key: &PoolKey, params: &SwapParams) -> Result<BalanceDelta, EngineError> {
        let limit = params.sqrt_price_limit_x96;
        if limit <= min_sqrt_price() || limit >= max_sqrt_price() {
            return Err(EngineError::InvalidPriceLimit {
                limit: limit.to_string(),
            });
        }

        let pool_id = key.id();
        let pool = self
            .pools
            .get_mut(&pool_id)
            .ok_or(EngineError::PoolNotFound(pool_id))?;
        let (num, den) = pool.price;
        let magnitude = params.specified_magnitude();

        // (amount0, amount1) from the swapper's side
        let (amount0, amount1, input) = match (params.zero_for_one, params.is_exact_input()) {
            (true, true) => (-(magnitude as i128), (magnitude * num / den) as i128, magnitude),
            (true, false) => {
                let input = (magnitude * den).div_ceil(num);
                (-(input as i128), magnitude as i128, input)
            }
            (false, true) => ((magnitude * den / num) as i128, -(magnitude as i128), magnitude),
            (false, false) => {
                let input = (magnitude * num).div_ceil(den);
                (magnitude as i128, -(input as i128), input)
            }
        };

        let moved = (input / pool.units_per_tick).min(i32::MAX as u128) as i32;
        let tick = if params.zero_for_one {
            pool.slot0.tick.saturating_sub(moved)
        } else {
            pool.slot0.tick.saturating_add(moved)
        };
        pool.slot0.tick = tick.clamp(MIN_TICK, MAX_TICK);

        Ok(BalanceDelta::new(amount0, amount1))
    }
}

impl CreditLedger for MockPoolManager {
    fn mint(&mut self, recipient: Address, currency: Currency, amount: u128) -> Result<(), EngineError> {
        let signed = i128::try_from(amount)
            .map_err(|_| EngineError::Rejected("mint amount too large".to_string()))?;
        let minter = self.hook;
        self.account(minter, currency, -signed);
        *self.claims.entry((recipient, currency)).or_insert(0) += amount;
        Ok(())
    }
}

impl PoolEngine for MockPoolManager {
    fn slot0(&self, pool: &PoolId) -> Result<Slot0, EngineError> {
        self.pools
            .get(pool)
            .map(|p| p.slot0)
            .ok_or(EngineError::PoolNotFound(*pool))
    }

    fn liquidity(&self, pool: &PoolId) -> Result<u128, EngineError> {
        self.pools
            .get(pool)
            .map(|p| p.liquidity)
            .ok_or(EngineError::PoolNotFound(*pool))
    }

    /// Nested swap by the hook; hook callbacks are not re-entered
    fn swap(
        &mut self,
        key: &PoolKey,
        params: &SwapParams,
        settlement: &mut dyn SettlementCallback,
    ) -> Result<BalanceDelta, EngineError> {
        let delta = self.price_swap(key, params)?;
        let hook = self.hook;
        self.account_delta(hook, key, delta);

        match self.fault {
            Some(SettlementFault::Skip) => {}
            Some(SettlementFault::InvokeTwice) => {
                settlement.on_swap_settled(self, delta)?;
                settlement.on_swap_settled(self, delta)?;
            }
            None => settlement.on_swap_settled(self, delta)?,
        }
        Ok(delta)
    }

    fn block_timestamp(&self) -> u32 {
        self.timestamp
    }
}

/// How a [`MockRouter`] answers the original-sender lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderLookup {
    /// No lookup function
    Unsupported,
    /// Reports the given account
    Forwards(Address),
    /// The lookup call reverts
    Reverts(String),
}

/// A calling contract, e.g. a swap router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRouter {
    pub address: Address,
    pub lookup: SenderLookup,
}

impl MockRouter {
    /// Router that forwards swaps for `sender`
    pub fn forwarding(address: Address, sender: Address) -> Self {
        Self {
            address,
            lookup: SenderLookup::Forwards(sender),
        }
    }

    /// Caller without the lookup capability
    pub fn plain(address: Address) -> Self {
        Self {
            address,
            lookup: SenderLookup::Unsupported,
        }
    }
}

impl Caller for MockRouter {
    fn address(&self) -> Address {
        self.address
    }

    fn current_original_sender(&self) -> Result<Address, CapabilityError> {
        match &self.lookup {
            SenderLookup::Unsupported => Err(CapabilityError::Unsupported),
            SenderLookup::Forwards(sender) => Ok(*sender),
            SenderLookup::Reverts(reason) => Err(CapabilityError::Reverted(reason.clone())),
        }
    }
}
