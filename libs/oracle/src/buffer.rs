//! Circular observation storage
//!
//! Slot arithmetic is always modulo the live `cardinality`, never modulo the
//! allocated length: slots reserved by [`ObservationBuffer::grow`] only join the
//! ring once a write reaches them.

use crate::errors::ObservationError;
use crate::observation::{lte, Observation};
use ethers_core::types::U256;
use tracing::debug;

/// The observation slots of a single pool
#[derive(Debug, Clone, Default)]
pub struct ObservationBuffer {
    slots: Vec<Observation>,
}

impl ObservationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot contents; slots never reserved read as empty
    pub fn get(&self, index: u16) -> Observation {
        self.slots
            .get(usize::from(index))
            .copied()
            .unwrap_or_default()
    }

    /// Number of slots allocated, live or reserved
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    fn store(&mut self, index: u16, observation: Observation) {
        let index = usize::from(index);
        if index >= self.slots.len() {
            self.slots.resize(index + 1, Observation::default());
        }
        self.slots[index] = observation;
    }

    /// Write the first observation; returns `(cardinality, cardinality_next)`
    pub fn initialize(&mut self, time: u32, tick: i32) -> (u16, u16) {
        self.store(0, Observation::first(time, tick));
        debug!(time, tick, "observation buffer initialized");
        (1, 1)
    }

    /// Append an observation after slot `index`; returns `(index, cardinality)`.
    ///
    /// At most one observation is written per timestamp. Live capacity grows by
    /// one slot when the write would otherwise wrap and the target allows it.
    pub fn write(
        &mut self,
        index: u16,
        time: u32,
        tick: i32,
        liquidity: u128,
        cardinality: u16,
        cardinality_next: u16,
    ) -> (u16, u16) {
        if cardinality == 0 {
            return (index, cardinality);
        }

        let last = self.get(index);
        if last.timestamp == time {
            return (index, cardinality);
        }

        let cardinality_updated = if cardinality_next > cardinality && index == cardinality - 1 {
            cardinality + 1
        } else {
            cardinality
        };

        let index_updated = ((u32::from(index) + 1) % u32::from(cardinality_updated)) as u16;
        self.store(index_updated, last.transform(time, tick, liquidity));

        debug!(
            time,
            tick,
            index = index_updated,
            cardinality = cardinality_updated,
            "observation written"
        );
        (index_updated, cardinality_updated)
    }

    /// Reserve slots up to `next`; returns the resulting target capacity.
    ///
    /// A no-op for an uninitialized buffer (`current == 0`) or when `next`
    /// does not exceed `current`.
    pub fn grow(&mut self, current: u16, next: u16) -> u16 {
        if current == 0 || next <= current {
            return current;
        }
        for index in current..next {
            self.store(index, Observation::placeholder());
        }
        debug!(from = current, to = next, "observation capacity reserved");
        next
    }

    /// Accumulators at each `seconds_agos[i]` seconds before `time`.
    ///
    /// `tick` and `liquidity` are the engine's current values, used to
    /// extrapolate past the most recent stored observation.
    pub fn observe(
        &self,
        time: u32,
        seconds_agos: &[u32],
        tick: i32,
        index: u16,
        liquidity: u128,
        cardinality: u16,
    ) -> Result<(Vec<i64>, Vec<U256>), ObservationError> {
        if cardinality == 0 {
            return Err(ObservationError::NotInitialized);
        }

        let mut tick_cumulatives = Vec::with_capacity(seconds_agos.len());
        let mut seconds_per_liquidity_cumulatives = Vec::with_capacity(seconds_agos.len());
        for &seconds_ago in seconds_agos {
            let observation =
                self.observe_single(time, seconds_ago, tick, index, liquidity, cardinality)?;
            tick_cumulatives.push(observation.tick_cumulative);
            seconds_per_liquidity_cumulatives.push(observation.seconds_per_liquidity_cumulative_x128);
        }
        Ok((tick_cumulatives, seconds_per_liquidity_cumulatives))
    }

    /// Observation as of `seconds_ago` seconds before `time`, real or synthesized
    pub fn observe_single(
        &self,
        time: u32,
        seconds_ago: u32,
        tick: i32,
        index: u16,
        liquidity: u128,
        cardinality: u16,
    ) -> Result<Observation, ObservationError> {
        if cardinality == 0 {
            return Err(ObservationError::NotInitialized);
        }

        if seconds_ago == 0 {
            let last = self.get(index);
            if last.timestamp != time {
                return Ok(last.transform(time, tick, liquidity));
            }
            return Ok(last);
        }

        let target = time.wrapping_sub(seconds_ago);
        let (before_or_at, at_or_after) =
            self.surrounding_observations(time, target, tick, index, liquidity, cardinality)?;

        if target == before_or_at.timestamp {
            Ok(before_or_at)
        } else if target == at_or_after.timestamp {
            Ok(at_or_after)
        } else {
            Ok(before_or_at.interpolate(&at_or_after, target))
        }
    }

    /// The observations at or immediately around `target`
    fn surrounding_observations(
        &self,
        time: u32,
        target: u32,
        tick: i32,
        index: u16,
        liquidity: u128,
        cardinality: u16,
    ) -> Result<(Observation, Observation), ObservationError> {
        let newest = self.get(index);

        if lte(time, newest.timestamp, target) {
            if newest.timestamp == target {
                return Ok((newest, newest));
            }
            return Ok((newest, newest.transform(target, tick, liquidity)));
        }

        let oldest = self.oldest(index, cardinality);
        if !lte(time, oldest.timestamp, target) {
            return Err(ObservationError::OutOfRange {
                target,
                oldest: oldest.timestamp,
            });
        }

        self.binary_search(time, target, index, cardinality)
    }

    /// The oldest live observation: the slot after `index`, or slot 0 when
    /// the ring has not wrapped into that slot yet
    fn oldest(&self, index: u16, cardinality: u16) -> Observation {
        let candidate = self.get(((u32::from(index) + 1) % u32::from(cardinality)) as u16);
        if candidate.initialized {
            candidate
        } else {
            self.get(0)
        }
    }

    /// Find the adjacent pair with `before.timestamp <= target <= after.timestamp`.
    ///
    /// The ring is searched as a sorted sequence starting at the oldest slot.
    /// Callers must already have checked that `target` lies within the ring.
    fn binary_search(
        &self,
        time: u32,
        target: u32,
        index: u16,
        cardinality: u16,
    ) -> Result<(Observation, Observation), ObservationError> {
        let cardinality = u32::from(cardinality);
        let slot = |i: u32| self.get((i % cardinality) as u16);

        let mut l = (u32::from(index) + 1) % cardinality;
        let mut r = l + cardinality - 1;

        loop {
            if l > r {
                // Only reachable if the ring was corrupted underneath us
                return Err(ObservationError::OutOfRange {
                    target,
                    oldest: self.oldest(index, cardinality as u16).timestamp,
                });
            }
            let i = (l + r) / 2;

            let before_or_at = slot(i);
            if !before_or_at.initialized {
                l = i + 1;
                continue;
            }

            let at_or_after = slot(i + 1);
            let target_at_or_after = lte(time, before_or_at.timestamp, target);

            if target_at_or_after && lte(time, target, at_or_after.timestamp) {
                return Ok((before_or_at, at_or_after));
            }

            if !target_at_or_after {
                if i == 0 {
                    return Err(ObservationError::OutOfRange {
                        target,
                        oldest: before_or_at.timestamp,
                    });
                }
                r = i - 1;
            } else {
                l = i + 1;
            }
        }
    }
}
