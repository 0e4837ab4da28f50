//! A pool's buffer and cursor, owned together

use crate::buffer::ObservationBuffer;
use crate::errors::ObservationError;
use crate::observation::{sub_u160, Observation};
use crate::state::ObservationState;
use ethers_core::types::U256;
use serde::Serialize;

/// Oracle data for one pool
#[derive(Debug, Clone, Default)]
pub struct PoolOracle {
    buffer: ObservationBuffer,
    state: ObservationState,
}

/// Averages over a trailing window, as returned by [`PoolOracle::consult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Consultation {
    /// Time-weighted mean tick, rounded toward negative infinity
    pub arithmetic_mean_tick: i32,
    /// Time-weighted harmonic mean of in-range liquidity
    pub harmonic_mean_liquidity: u128,
}

impl PoolOracle {
    /// Oracle with its first observation at `time`
    pub fn initialize(time: u32, tick: i32) -> Self {
        let mut buffer = ObservationBuffer::new();
        let (cardinality, cardinality_next) = buffer.initialize(time, tick);
        Self {
            buffer,
            state: ObservationState {
                index: 0,
                cardinality,
                cardinality_next,
            },
        }
    }

    pub fn state(&self) -> ObservationState {
        self.state
    }

    pub fn observation(&self, index: u16) -> Observation {
        self.buffer.get(index)
    }

    /// The most recently written observation
    pub fn latest(&self) -> Observation {
        self.buffer.get(self.state.index)
    }

    /// Record the tick and liquidity that prevailed up to `time`.
    ///
    /// Returns false when an observation already exists for `time`.
    pub fn record(&mut self, time: u32, tick: i32, liquidity: u128) -> bool {
        let written = self.state.is_initialized() && self.latest().timestamp != time;
        let (index, cardinality) = self.buffer.write(
            self.state.index,
            time,
            tick,
            liquidity,
            self.state.cardinality,
            self.state.cardinality_next,
        );
        self.state.index = index;
        self.state.cardinality = cardinality;
        written
    }

    /// Raise the target capacity; returns `(old, new)`
    pub fn grow(&mut self, desired: u16) -> (u16, u16) {
        let old = self.state.cardinality_next;
        self.state.cardinality_next = self.buffer.grow(old, desired);
        (old, self.state.cardinality_next)
    }

    /// Accumulators at each of `seconds_agos` before `time`
    pub fn observe(
        &self,
        time: u32,
        seconds_agos: &[u32],
        tick: i32,
        liquidity: u128,
    ) -> Result<(Vec<i64>, Vec<U256>), ObservationError> {
        self.buffer.observe(
            time,
            seconds_agos,
            tick,
            self.state.index,
            liquidity,
            self.state.cardinality,
        )
    }

    /// Mean tick and harmonic mean liquidity over the `window` seconds before `time`
    pub fn consult(
        &self,
        time: u32,
        window: u32,
        tick: i32,
        liquidity: u128,
    ) -> Result<Consultation, ObservationError> {
        if window == 0 {
            return Err(ObservationError::ZeroWindow);
        }

        let (tick_cumulatives, spl_cumulatives) =
            self.observe(time, &[window, 0], tick, liquidity)?;

        let tick_delta = tick_cumulatives[1].wrapping_sub(tick_cumulatives[0]);
        let window_i = i64::from(window);
        let mut mean_tick = tick_delta / window_i;
        if tick_delta < 0 && tick_delta % window_i != 0 {
            mean_tick -= 1;
        }

        // window * (2^160 - 1) / (spl_delta << 32)
        let spl_delta = sub_u160(spl_cumulatives[1], spl_cumulatives[0]);
        let window_x160 = U256::from(window) * ((U256::one() << 160) - U256::one());
        let denominator = spl_delta << 32;
        let harmonic = if denominator.is_zero() {
            u128::MAX
        } else {
            let value = window_x160 / denominator;
            if value > U256::from(u128::MAX) {
                u128::MAX
            } else {
                value.as_u128()
            }
        };

        Ok(Consultation {
            arithmetic_mean_tick: mean_tick as i32,
            harmonic_mean_liquidity: harmonic,
        })
    }
}
