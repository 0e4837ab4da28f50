//! Parameters exchanged with the pool engine
//!
//! Signs follow the engine's conventions: a negative `amount_specified` is an
//! exact-input swap, and a positive [`BalanceDelta`] leg is owed *to* the
//! caller.

use ethers_core::types::{H256, U256};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// Parameters of a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParams {
    /// true = currency0 in, currency1 out
    pub zero_for_one: bool,
    /// Negative for exact input, positive for exact output
    pub amount_specified: i128,
    /// Q64.96 sqrt price the swap may not cross
    pub sqrt_price_limit_x96: U256,
}

impl SwapParams {
    pub fn is_exact_input(&self) -> bool {
        self.amount_specified < 0
    }

    /// Whether the specified amount is denominated in currency0
    pub fn specified_is_currency0(&self) -> bool {
        self.is_exact_input() == self.zero_for_one
    }

    /// Absolute size of the specified amount
    pub fn specified_magnitude(&self) -> u128 {
        self.amount_specified.unsigned_abs()
    }
}

/// Parameters of a liquidity modification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyLiquidityParams {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity_delta: i128,
    /// Distinguishes positions with the same owner and range
    pub salt: H256,
}

/// Net token movement of an engine operation, from the caller's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct BalanceDelta {
    pub amount0: i128,
    pub amount1: i128,
}

impl BalanceDelta {
    pub const ZERO: BalanceDelta = BalanceDelta {
        amount0: 0,
        amount1: 0,
    };

    pub fn new(amount0: i128, amount1: i128) -> Self {
        Self { amount0, amount1 }
    }

    /// Leg for currency0 when `zero`, else currency1
    pub fn amount(&self, zero: bool) -> i128 {
        if zero {
            self.amount0
        } else {
            self.amount1
        }
    }

    /// Split into (specified, unspecified) legs for a swap whose specified
    /// amount is denominated in currency0 when `specified_is_0`
    pub fn split(&self, specified_is_0: bool) -> (i128, i128) {
        (self.amount(specified_is_0), self.amount(!specified_is_0))
    }
}

impl Add for BalanceDelta {
    type Output = BalanceDelta;

    fn add(self, rhs: Self) -> Self {
        BalanceDelta::new(self.amount0 + rhs.amount0, self.amount1 + rhs.amount1)
    }
}

impl Sub for BalanceDelta {
    type Output = BalanceDelta;

    fn sub(self, rhs: Self) -> Self {
        BalanceDelta::new(self.amount0 - rhs.amount0, self.amount1 - rhs.amount1)
    }
}

impl Neg for BalanceDelta {
    type Output = BalanceDelta;

    fn neg(self) -> Self {
        BalanceDelta::new(-self.amount0, -self.amount1)
    }
}
