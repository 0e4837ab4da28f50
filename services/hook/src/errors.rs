//! Hook error types

use ethers_core::types::Address;
use oracle::ObservationError;
use rebound_config::ConfigError;
use thiserror::Error;
use types::PoolId;

/// Failure to look up an optional capability on a calling contract
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("caller does not expose the capability")]
    Unsupported,

    #[error("capability call reverted: {0}")]
    Reverted(String),

    #[error("capability returned the zero address")]
    ZeroAddress,
}

/// Errors raised by the pool engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("pool {0} does not exist")]
    PoolNotFound(PoolId),

    #[error("swap completed without invoking the settlement callback")]
    SettlementSkipped,

    #[error("price limit {limit} invalid for swap direction")]
    InvalidPriceLimit { limit: String },

    #[error("engine rejected operation: {0}")]
    Rejected(String),
}

/// Errors returned from hook callbacks and queries
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HookError {
    #[error("pool must use fee 0 and tick spacing {expected_tick_spacing}, got fee {fee} and tick spacing {tick_spacing}")]
    DuplicatePoolConfiguration {
        fee: u32,
        tick_spacing: i32,
        expected_tick_spacing: i32,
    },

    #[error("position [{tick_lower}, {tick_upper}] is not full range")]
    NonFullRangePosition { tick_lower: i32, tick_upper: i32 },

    #[error("only exact-input swaps are accepted, got amount {amount_specified}")]
    NotExactInput { amount_specified: i128 },

    #[error("could not resolve original sender through {intermediary:?}: {reason}")]
    UnresolvedOriginalSender {
        intermediary: Address,
        #[source]
        reason: CapabilityError,
    },

    #[error("observation query failed: {0}")]
    Observation(#[from] ObservationError),

    #[error("pool {0} has not been initialized with this hook")]
    PoolNotInitialized(PoolId),

    #[error("pool {0} is already initialized")]
    PoolAlreadyInitialized(PoolId),

    #[error("pool engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("invalid hook configuration: {0}")]
    Configuration(#[from] ConfigError),
}

impl HookError {
    /// Structural errors reject a malformed request, as opposed to runtime failures
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            HookError::DuplicatePoolConfiguration { .. }
                | HookError::NonFullRangePosition { .. }
                | HookError::NotExactInput { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unresolved_sender_keeps_reason() {
        let err = HookError::UnresolvedOriginalSender {
            intermediary: Address::repeat_byte(0x11),
            reason: CapabilityError::Unsupported,
        };
        assert!(err.to_string().contains("0x1111"));
        assert_eq!(
            err.source().map(|source| source.to_string()),
            Some(CapabilityError::Unsupported.to_string())
        );
        assert!(!err.is_structural());
    }

    #[test]
    fn test_structural_classification() {
        assert!(HookError::NotExactInput { amount_specified: 5 }.is_structural());
        assert!(HookError::NonFullRangePosition {
            tick_lower: -60,
            tick_upper: 60
        }
        .is_structural());
        assert!(!HookError::Engine(EngineError::SettlementSkipped).is_structural());
    }
}
