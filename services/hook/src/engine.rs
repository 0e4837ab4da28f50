//! Traits at the boundary with the external pool engine
//!
//! The engine owns swap execution, liquidity accounting and price math. The
//! hook only reads its state, asks it to swap, and credits balances through it.

use crate::errors::{CapabilityError, EngineError};
use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};
use types::{BalanceDelta, Currency, PoolId, PoolKey, SwapParams};

/// Current price of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

/// Ledger credit primitive of the engine
pub trait CreditLedger {
    /// Credit `amount` of `currency` to `recipient` as a claim held by the
    /// engine. No tokens move; the caller's own balance is debited by the same
    /// amount.
    fn mint(&mut self, recipient: Address, currency: Currency, amount: u128) -> Result<(), EngineError>;
}

/// Continuation handed to [`PoolEngine::swap`] for a nested swap.
///
/// The engine calls [`SettlementCallback::on_swap_settled`] exactly once,
/// after computing the swap's balance delta and before the swap returns.
pub trait SettlementCallback {
    fn on_swap_settled(
        &mut self,
        ledger: &mut dyn CreditLedger,
        delta: BalanceDelta,
    ) -> Result<(), EngineError>;
}

/// Operations the hook consumes from the pool engine
pub trait PoolEngine: CreditLedger {
    fn slot0(&self, pool: &PoolId) -> Result<Slot0, EngineError>;

    /// In-range liquidity
    fn liquidity(&self, pool: &PoolId) -> Result<u128, EngineError>;

    /// Execute a swap on behalf of the hook. The returned delta is from the
    /// hook's side: positive legs are owed to it.
    fn swap(
        &mut self,
        key: &PoolKey,
        params: &SwapParams,
        settlement: &mut dyn SettlementCallback,
    ) -> Result<BalanceDelta, EngineError>;

    /// Timestamp of the block being executed
    fn block_timestamp(&self) -> u32;
}

/// The contract that called into the engine, e.g. a swap router
pub trait Caller {
    fn address(&self) -> Address;

    /// The account on whose behalf this caller is acting.
    ///
    /// Routers that forward swaps for users expose this; the default reports
    /// the capability as missing.
    fn current_original_sender(&self) -> Result<Address, CapabilityError> {
        Err(CapabilityError::Unsupported)
    }
}

/// Resolve the account a backrun should be credited to
pub fn resolve_original_sender(caller: &dyn Caller) -> Result<Address, CapabilityError> {
    let sender = caller.current_original_sender()?;
    if sender.is_zero() {
        return Err(CapabilityError::ZeroAddress);
    }
    Ok(sender)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain(Address);

    impl Caller for Plain {
        fn address(&self) -> Address {
            self.0
        }
    }

    struct Forwarding {
        router: Address,
        sender: Address,
    }

    impl Caller for Forwarding {
        fn address(&self) -> Address {
            self.router
        }

        fn current_original_sender(&self) -> Result<Address, CapabilityError> {
            Ok(self.sender)
        }
    }

    #[test]
    fn test_resolve_requires_capability() {
        let caller = Plain(Address::repeat_byte(1));
        assert_eq!(
            resolve_original_sender(&caller),
            Err(CapabilityError::Unsupported)
        );
    }

    #[test]
    fn test_resolve_rejects_zero_sender() {
        let caller = Forwarding {
            router: Address::repeat_byte(1),
            sender: Address::zero(),
        };
        assert_eq!(
            resolve_original_sender(&caller),
            Err(CapabilityError::ZeroAddress)
        );
    }

    #[test]
    fn test_resolve_returns_forwarded_sender() {
        let sender = Address::repeat_byte(0xaa);
        let caller = Forwarding {
            router: Address::repeat_byte(1),
            sender,
        };
        assert_eq!(resolve_original_sender(&caller), Ok(sender));
    }
}
