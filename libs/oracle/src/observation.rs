//! A single oracle observation and the arithmetic that advances it

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

/// One slot of the observation buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Observation {
    /// Block timestamp of the observation
    pub timestamp: u32,

    /// Tick multiplied by seconds elapsed for the life of the pool as of `timestamp`
    pub tick_cumulative: i64,

    /// Seconds per unit of in-range liquidity for the life of the pool, as a
    /// Q128 value kept modulo 2^160
    pub seconds_per_liquidity_cumulative_x128: U256,

    /// Tick in effect over the interval this observation closes
    pub prev_tick: i32,

    /// Whether the slot holds a real observation rather than a placeholder
    pub initialized: bool,
}

impl Observation {
    /// First observation of a pool: zero accumulators
    pub fn first(time: u32, tick: i32) -> Self {
        Self {
            timestamp: time,
            tick_cumulative: 0,
            seconds_per_liquidity_cumulative_x128: U256::zero(),
            prev_tick: tick,
            initialized: true,
        }
    }

    /// Uninitialized slot reserved by a grow.
    ///
    /// A timestamp of 1 is below any real first timestamp, so searches treat
    /// the slot as older than everything until it is written.
    pub fn placeholder() -> Self {
        Self {
            timestamp: 1,
            ..Self::default()
        }
    }

    /// The observation that follows `self` at `time`, given the tick and
    /// liquidity that prevailed since `self.timestamp`
    pub fn transform(&self, time: u32, tick: i32, liquidity: u128) -> Self {
        let delta = time.wrapping_sub(self.timestamp);
        let liquidity = U256::from(liquidity.max(1));
        Self {
            timestamp: time,
            tick_cumulative: self
                .tick_cumulative
                .wrapping_add(i64::from(tick).wrapping_mul(i64::from(delta))),
            seconds_per_liquidity_cumulative_x128: add_u160(
                self.seconds_per_liquidity_cumulative_x128,
                (U256::from(delta) << 128) / liquidity,
            ),
            prev_tick: tick,
            initialized: true,
        }
    }

    /// Observation at `target`, linearly interpolated between `self` and a
    /// later observation `after`
    pub(crate) fn interpolate(&self, after: &Observation, target: u32) -> Self {
        let observation_time_delta = after.timestamp.wrapping_sub(self.timestamp);
        let target_delta = target.wrapping_sub(self.timestamp);

        // Divide before multiplying, matching the engine's rounding for tick cumulatives
        let tick_rate = after.tick_cumulative.wrapping_sub(self.tick_cumulative)
            / i64::from(observation_time_delta);
        let spl_delta = sub_u160(
            after.seconds_per_liquidity_cumulative_x128,
            self.seconds_per_liquidity_cumulative_x128,
        );

        Self {
            timestamp: target,
            tick_cumulative: self
                .tick_cumulative
                .wrapping_add(tick_rate.wrapping_mul(i64::from(target_delta))),
            seconds_per_liquidity_cumulative_x128: add_u160(
                self.seconds_per_liquidity_cumulative_x128,
                spl_delta * U256::from(target_delta) / U256::from(observation_time_delta),
            ),
            prev_tick: self.prev_tick,
            initialized: true,
        }
    }
}

/// Whether `a` is chronologically at or before `b`.
///
/// Both timestamps must be at or before `time` once wraparound is accounted
/// for: anything numerically greater than `time` is taken to be from the
/// previous 2^32 epoch.
pub fn lte(time: u32, a: u32, b: u32) -> bool {
    if a <= time && b <= time {
        return a <= b;
    }
    let epoch = 1u64 << 32;
    let a_adjusted = if a > time { u64::from(a) } else { u64::from(a) + epoch };
    let b_adjusted = if b > time { u64::from(b) } else { u64::from(b) + epoch };
    a_adjusted <= b_adjusted
}

fn u160_mask() -> U256 {
    (U256::one() << 160) - U256::one()
}

/// `a + b` modulo 2^160
pub(crate) fn add_u160(a: U256, b: U256) -> U256 {
    a.overflowing_add(b).0 & u160_mask()
}

/// `a - b` modulo 2^160
pub(crate) fn sub_u160(a: U256, b: U256) -> U256 {
    a.overflowing_sub(b).0 & u160_mask()
}
