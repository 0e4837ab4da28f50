//! # Rebound AMM Library - Backrun Sizing Mathematics
//!
//! ## Purpose
//!
//! Integer-exact sizing for backruns: given how far a swap pushed a pool's tick
//! away from its last oracle observation, decide whether to trade back and how
//! much, and build the parameters of that reverse trade. All arithmetic is
//! integer with 256-bit intermediates, so results are deterministic and auditable.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Current tick from the pool engine, last recorded tick from
//!   the oracle, executed swap parameters from the hook
//! - **Output Destinations**: Backrun executor in the hook service
//! - **Configuration**: [`SizingConfig`] tier boundaries and tolerance
//!
//! ## Sizing Tiers
//!
//! ```text
//! amount
//!   ▲                    ┌──────────── full × tolerance
//!   │                   ╱
//!   │                 ╱
//!   │               ╱
//!   │─────────────╱
//!   └────────────┴──────┴─────────────▶ |Δtick|
//!               MIN    LIMIT
//! ```
//!
//! Sizing is monotonic in the deviation and continuous at both boundaries.

pub mod backrun_size;
pub mod reverse;

pub use backrun_size::{BackrunSize, BackrunSizer, SizingConfig, SizingError, BPS_DENOMINATOR};
pub use reverse::reverse_swap;
