//! Backrun sizing from tick deviation
//!
//! Decides how much of a swap to trade back, given how far the swap moved the
//! pool's tick away from the last recorded observation.

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Denominator of `tolerance_bps`
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Errors in sizing configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SizingError {
    #[error("min tick delta {min} must be below limit tick delta {limit}")]
    InvertedTiers { min: u32, limit: u32 },

    #[error("tolerance {tolerance_bps} bps is not in allowed range [1, {max}]")]
    ToleranceOutOfRange { tolerance_bps: u32, max: u32 },
}

/// Tier boundaries for backrun sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Deviations at or below this many ticks are left alone
    pub min_tick_delta: u32,
    /// Deviations at or above this many ticks reverse the whole swap
    pub limit_tick_delta: u32,
    /// Share of the computed size actually traded, in basis points.
    /// Kept just under 100% so boundary rounding cannot overshoot the pool.
    pub tolerance_bps: u32,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            min_tick_delta: 10,
            limit_tick_delta: 200,
            tolerance_bps: 9_999, // 99.99%
        }
    }
}

impl SizingConfig {
    pub fn validate(&self) -> Result<(), SizingError> {
        if self.min_tick_delta >= self.limit_tick_delta {
            return Err(SizingError::InvertedTiers {
                min: self.min_tick_delta,
                limit: self.limit_tick_delta,
            });
        }
        if self.tolerance_bps == 0 || self.tolerance_bps > BPS_DENOMINATOR {
            return Err(SizingError::ToleranceOutOfRange {
                tolerance_bps: self.tolerance_bps,
                max: BPS_DENOMINATOR,
            });
        }
        Ok(())
    }
}

/// Outcome of sizing a backrun
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BackrunSize {
    /// Deviation too small, or sized to nothing
    Skip { delta: u32 },
    /// Deviation between the tiers: a proportional share of the swap
    Partial { delta: u32, amount: u128 },
    /// Deviation at or past the limit: the whole swap
    Full { delta: u32, amount: u128 },
}

impl BackrunSize {
    /// Amount to trade back; zero when skipped
    pub fn amount(&self) -> u128 {
        match self {
            BackrunSize::Skip { .. } => 0,
            BackrunSize::Partial { amount, .. } | BackrunSize::Full { amount, .. } => *amount,
        }
    }

    pub fn delta(&self) -> u32 {
        match self {
            BackrunSize::Skip { delta }
            | BackrunSize::Partial { delta, .. }
            | BackrunSize::Full { delta, .. } => *delta,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, BackrunSize::Skip { .. })
    }
}

/// Three-tier backrun sizer
#[derive(Debug, Clone)]
pub struct BackrunSizer {
    config: SizingConfig,
}

impl BackrunSizer {
    pub fn new(config: SizingConfig) -> Result<Self, SizingError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SizingConfig {
        &self.config
    }

    /// Absolute tick deviation between the pool now and the last observation
    pub fn tick_delta(current_tick: i32, last_tick: i32) -> u32 {
        (i64::from(current_tick) - i64::from(last_tick)).unsigned_abs() as u32
    }

    /// Size a backrun against a swap of `swap_magnitude` that moved the tick
    /// from `last_tick` to `current_tick`
    pub fn size(&self, current_tick: i32, last_tick: i32, swap_magnitude: u128) -> BackrunSize {
        let delta = Self::tick_delta(current_tick, last_tick);
        let SizingConfig {
            min_tick_delta,
            limit_tick_delta,
            tolerance_bps,
        } = self.config;

        let outcome = if delta <= min_tick_delta {
            BackrunSize::Skip { delta }
        } else if delta < limit_tick_delta {
            // magnitude * (delta - min) / (limit - min) * tolerance, floored once at the end
            let numerator = U256::from(swap_magnitude)
                * U256::from(delta - min_tick_delta)
                * U256::from(tolerance_bps);
            let denominator =
                U256::from(limit_tick_delta - min_tick_delta) * U256::from(BPS_DENOMINATOR);
            let amount = (numerator / denominator).as_u128();
            if amount == 0 {
                BackrunSize::Skip { delta }
            } else {
                BackrunSize::Partial { delta, amount }
            }
        } else {
            let amount = Self::apply_tolerance(swap_magnitude, tolerance_bps);
            if amount == 0 {
                BackrunSize::Skip { delta }
            } else {
                BackrunSize::Full { delta, amount }
            }
        };

        trace!(current_tick, last_tick, swap_magnitude, ?outcome, "backrun sized");
        outcome
    }

    fn apply_tolerance(amount: u128, tolerance_bps: u32) -> u128 {
        (U256::from(amount) * U256::from(tolerance_bps) / U256::from(BPS_DENOMINATOR)).as_u128()
    }
}
