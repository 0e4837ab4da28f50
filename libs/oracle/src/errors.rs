//! Oracle query errors

use thiserror::Error;

/// Errors raised by observation queries
///
/// These are range problems with the query, not configuration problems: a
/// caller seeing `OutOfRange` can retry with a shorter window.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObservationError {
    /// Requested time predates the oldest retained observation
    #[error("observation target {target} is older than the oldest retained observation at {oldest}")]
    OutOfRange { target: u32, oldest: u32 },

    /// Averaging window of zero seconds
    #[error("averaging window must be non-zero")]
    ZeroWindow,

    /// Buffer has no observations yet
    #[error("observation buffer is not initialized")]
    NotInitialized,
}
