//! # Rebound Oracle - Per-Pool Observation Buffer
//!
//! ## Purpose
//!
//! Keeps a bounded time-series of price and liquidity observations for each pool.
//! Every observation carries running accumulators, so a time-weighted average over
//! any retained window is the difference of two samples divided by the window.
//!
//! ## Layout
//!
//! - [`Observation`]: one slot, with `tick_cumulative`,
//!   `seconds_per_liquidity_cumulative_x128` and the tick that prevailed when it
//!   was written (`prev_tick`)
//! - [`ObservationState`]: the cursor (`index`, `cardinality`, `cardinality_next`)
//! - [`ObservationBuffer`]: the circular slots and the write/grow/observe algorithms
//! - [`PoolOracle`]: a buffer and its cursor owned together, one per pool
//!
//! ## Architecture Role
//!
//! ```text
//! Liquidity / Swap Callback → [PoolOracle::record] → Observation Slots
//!                                                        ↓
//! TWAP Consumers ← [PoolOracle::observe] ← Binary Search + Interpolation
//! Backrun Sizing ← [PoolOracle::latest().prev_tick]
//! ```
//!
//! ## Capacity
//!
//! Each pool starts with one live slot. Anyone may raise `cardinality_next`; live
//! capacity then follows one slot per write until it reaches the target. Once full
//! the buffer wraps and overwrites its oldest slot. Capacity is bounded by
//! [`MAX_CAPACITY`].

pub mod buffer;
pub mod errors;
pub mod observation;
pub mod pool_oracle;
pub mod state;

pub use buffer::ObservationBuffer;
pub use errors::ObservationError;
pub use observation::{lte, Observation};
pub use pool_oracle::{Consultation, PoolOracle};
pub use state::ObservationState;

/// Hard upper bound on slots per pool
pub const MAX_CAPACITY: u16 = u16::MAX;
