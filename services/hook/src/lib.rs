//! # Rebound Hook - Oracle-Backed Backrun Service
//!
//! ## Purpose
//!
//! Pool-engine hook that records a price/liquidity observation on every
//! liquidity change and swap, and after each swap trades back against it in
//! proportion to how far the swap pushed the tick. The value recaptured by
//! the reverse trade is credited to the account that originated the swap
//! rather than leaking to arbitrageurs.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Engine callbacks ([`BackrunHook`]), engine state via
//!   [`PoolEngine`]
//! - **Output Destinations**: Nested swaps and ledger credits on the engine,
//!   balance adjustments returned from `after_swap`
//! - **Configuration**: [`rebound_config::HookConfig`]
//!
//! ## Architecture Role
//!
//! ```text
//! Engine Callback → [BackrunHook] → validate → PoolOracle::record
//!                        ↓ after_swap
//!                 [BackrunExecutor] → BackrunSizer → PoolEngine::swap
//!                                                         ↓
//!                                  BackrunSettlement → PoolEngine::mint(original sender)
//! ```
//!
//! ## Pool Rules
//!
//! One canonical pool per currency pair (fee 0, maximum tick spacing),
//! full-range liquidity only, exact-input swaps only.

pub mod backrun;
pub mod coordinator;
pub mod engine;
pub mod errors;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backrun::{BackrunExecutor, BackrunOutcome, BackrunSettlement, PendingBackrun, SettledBackrun};
pub use coordinator::{BackrunHook, HookCallback, HookPermissions};
pub use engine::{resolve_original_sender, Caller, CreditLedger, PoolEngine, SettlementCallback, Slot0};
pub use errors::{CapabilityError, EngineError, HookError};
