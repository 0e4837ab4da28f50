//! # Rebound Shared Types
//!
//! Types shared by the oracle, sizing and hook crates.
//!
//! ## Contents
//!
//! - **Pool identity**: [`Currency`], [`PoolKey`] and the derived [`PoolId`]
//! - **Engine parameters**: [`SwapParams`], [`ModifyLiquidityParams`], [`BalanceDelta`]
//! - **Tick bounds**: tick range, tick spacing limits, sqrt price limits and
//!   full-range helpers in [`tick`]
//!
//! ## Usage
//!
//! ```rust
//! use types::{Currency, PoolKey, tick::MAX_TICK_SPACING};
//! use ethers_core::types::Address;
//!
//! let key = PoolKey::new(
//!     Currency::from(Address::from_low_u64_be(1)),
//!     Currency::from(Address::from_low_u64_be(2)),
//!     0,
//!     MAX_TICK_SPACING,
//!     Address::from_low_u64_be(0xbeef),
//! )
//! .unwrap();
//! let id = key.id();
//! assert_eq!(id, key.id());
//! ```

pub mod errors;
pub mod params;
pub mod pool;
pub mod tick;

pub use errors::TypesError;
pub use params::{BalanceDelta, ModifyLiquidityParams, SwapParams};
pub use pool::{Currency, PoolId, PoolKey};

/// Re-exported primitives so downstream crates agree on one set of types
pub use ethers_core::types::{Address, U256};
