//! Shared fixtures for hook integration tests

#![allow(dead_code)]

use ethers_core::types::{Address, H256, U256};
use rebound_config::{init_logging, HookConfig, LoggingConfig};
use rebound_hook::testing::{MockPoolManager, MockRouter};
use rebound_hook::BackrunHook;
use types::tick::{extreme_price_limit, max_usable_tick, min_usable_tick, MAX_TICK_SPACING};
use types::{Currency, ModifyLiquidityParams, PoolId, PoolKey, SwapParams};

pub const START_TIME: u32 = 1;
pub const LIQUIDITY: u128 = 1_000_000_000;

pub fn hook_address() -> Address {
    Address::from_low_u64_be(0x2000_00c0)
}

pub fn user() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn router() -> MockRouter {
    MockRouter::forwarding(Address::repeat_byte(0x77), user())
}

pub fn currency0() -> Currency {
    Currency(Address::from_low_u64_be(0x1000))
}

pub fn currency1() -> Currency {
    Currency(Address::from_low_u64_be(0x2000))
}

pub fn pool_key() -> PoolKey {
    PoolKey::new(currency0(), currency1(), 0, MAX_TICK_SPACING, hook_address()).unwrap()
}

pub fn full_range(liquidity_delta: i128) -> ModifyLiquidityParams {
    ModifyLiquidityParams {
        tick_lower: min_usable_tick(MAX_TICK_SPACING),
        tick_upper: max_usable_tick(MAX_TICK_SPACING),
        liquidity_delta,
        salt: H256::zero(),
    }
}

pub fn exact_input(zero_for_one: bool, amount: u128) -> SwapParams {
    SwapParams {
        zero_for_one,
        amount_specified: -(amount as i128),
        sqrt_price_limit_x96: extreme_price_limit(zero_for_one),
    }
}

pub struct Harness {
    pub hook: BackrunHook,
    pub engine: MockPoolManager,
    pub router: MockRouter,
    pub key: PoolKey,
    pub pool: PoolId,
}

impl Harness {
    /// Pool initialized at tick 0 with full-range liquidity, default settings
    pub fn new() -> Self {
        Self::with_config(&HookConfig::default())
    }

    pub fn with_config(config: &HookConfig) -> Self {
        init_logging(&LoggingConfig::default());

        let mut hook = BackrunHook::new(hook_address(), config).unwrap();
        let mut engine = MockPoolManager::new(hook_address(), START_TIME);
        let router = router();
        let key = pool_key();
        let pool = engine
            .initialize_pool(&mut hook, &router, &key, U256::one() << 96, 0)
            .unwrap();
        engine
            .modify_liquidity(&mut hook, &router, &key, &full_range(LIQUIDITY as i128))
            .unwrap();

        Self {
            hook,
            engine,
            router,
            key,
            pool,
        }
    }

    pub fn tick(&self) -> i32 {
        self.engine.pool(&self.pool).unwrap().slot0.tick
    }
}
