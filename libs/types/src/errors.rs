//! Error types for pool identity validation

use thiserror::Error;

/// Errors raised while constructing pool identities
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Currencies must be sorted and distinct
    #[error("currency0 {currency0} must sort strictly below currency1 {currency1}")]
    CurrenciesOutOfOrder { currency0: String, currency1: String },

    /// Tick spacing outside the engine's accepted range
    #[error("tick spacing {tick_spacing} is not in allowed range [{min}, {max}]")]
    TickSpacingOutOfRange { tick_spacing: i32, min: i32, max: i32 },

    /// Fee exceeds the 24-bit fee domain
    #[error("fee {fee} exceeds maximum {max}")]
    FeeTooLarge { fee: u32, max: u32 },
}
