//! Backrun execution
//!
//! After a swap settles, compare the pool's tick with the tick recorded by the
//! last observation, size a reverse trade and run it through the engine. The
//! specified-currency proceeds are credited to the account that originated the
//! swap; the unspecified liability is handed back to the coordinator.

use crate::engine::{resolve_original_sender, Caller, CreditLedger, PoolEngine, SettlementCallback};
use crate::errors::{EngineError, HookError};
use ethers_core::types::Address;
use rebound_amm::{reverse_swap, BackrunSize, BackrunSizer};
use serde::Serialize;
use tracing::{debug, info};
use types::{BalanceDelta, Currency, PoolKey, SwapParams};

/// What the settlement callback needs to route the nested swap's proceeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingBackrun {
    pub recipient: Address,
    /// Specified currency of the original swap
    pub currency: Currency,
    pub specified_is_0: bool,
}

/// Result of a settled backrun
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettledBackrun {
    /// Specified-currency amount credited to the recipient
    pub credited: u128,
    /// Unspecified-currency leg, always negative
    pub unspecified: i128,
}

/// Single-use continuation carrying a pending backrun into the engine's swap
#[derive(Debug)]
pub struct BackrunSettlement {
    pending: PendingBackrun,
    settled: Option<SettledBackrun>,
    invoked: bool,
}

impl BackrunSettlement {
    pub fn new(pending: PendingBackrun) -> Self {
        Self {
            pending,
            settled: None,
            invoked: false,
        }
    }

    /// The settlement, if the engine invoked the callback
    pub fn settled(&self) -> Option<SettledBackrun> {
        self.settled
    }
}

impl SettlementCallback for BackrunSettlement {
    fn on_swap_settled(
        &mut self,
        ledger: &mut dyn CreditLedger,
        delta: BalanceDelta,
    ) -> Result<(), EngineError> {
        assert!(!self.invoked, "backrun settlement invoked more than once");
        self.invoked = true;

        let (specified, unspecified) = delta.split(self.pending.specified_is_0);
        assert!(
            specified > 0 && unspecified < 0,
            "backrun delta has unexpected signs: specified {}, unspecified {}",
            specified,
            unspecified
        );

        let credited = specified.unsigned_abs();
        ledger.mint(self.pending.recipient, self.pending.currency, credited)?;
        self.settled = Some(SettledBackrun {
            credited,
            unspecified,
        });
        Ok(())
    }
}

/// Outcome of a backrun attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BackrunOutcome {
    /// Deviation too small to act on
    Skipped(BackrunSize),
    Executed {
        size: BackrunSize,
        recipient: Address,
        settlement: SettledBackrun,
    },
}

impl BackrunOutcome {
    /// Balance adjustment the after-swap callback returns
    pub fn hook_delta(&self) -> i128 {
        match self {
            BackrunOutcome::Skipped(_) => 0,
            BackrunOutcome::Executed { settlement, .. } => -settlement.unspecified,
        }
    }
}

/// Sizes and executes backruns against the engine
#[derive(Debug, Clone)]
pub struct BackrunExecutor {
    sizer: BackrunSizer,
}

impl BackrunExecutor {
    pub fn new(sizer: BackrunSizer) -> Self {
        Self { sizer }
    }

    pub fn sizer(&self) -> &BackrunSizer {
        &self.sizer
    }

    /// Trade back against `original`, which moved the tick away from `last_tick`
    pub fn execute<E: PoolEngine>(
        &self,
        engine: &mut E,
        caller: &dyn Caller,
        key: &PoolKey,
        original: &SwapParams,
        last_tick: i32,
    ) -> Result<BackrunOutcome, HookError> {
        let pool_id = key.id();
        let current_tick = engine.slot0(&pool_id)?.tick;
        let size = self
            .sizer
            .size(current_tick, last_tick, original.specified_magnitude());

        if size.is_skip() {
            debug!(pool = ?pool_id, current_tick, last_tick, "backrun skipped");
            return Ok(BackrunOutcome::Skipped(size));
        }

        let recipient = resolve_original_sender(caller).map_err(|reason| {
            HookError::UnresolvedOriginalSender {
                intermediary: caller.address(),
                reason,
            }
        })?;

        let specified_is_0 = original.specified_is_currency0();
        let mut settlement = BackrunSettlement::new(PendingBackrun {
            recipient,
            currency: key.currency(specified_is_0),
            specified_is_0,
        });
        let params = reverse_swap(original, size.amount());
        let delta = engine.swap(key, &params, &mut settlement)?;
        let settled = settlement.settled().ok_or(EngineError::SettlementSkipped)?;

        info!(
            pool = ?pool_id,
            delta_ticks = size.delta(),
            amount = size.amount(),
            ?recipient,
            amount0 = delta.amount0,
            amount1 = delta.amount1,
            "backrun executed"
        );

        Ok(BackrunOutcome::Executed {
            size,
            recipient,
            settlement: settled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingLedger {
        minted: Vec<(Address, Currency, u128)>,
    }

    impl CreditLedger for RecordingLedger {
        fn mint(
            &mut self,
            recipient: Address,
            currency: Currency,
            amount: u128,
        ) -> Result<(), EngineError> {
            self.minted.push((recipient, currency, amount));
            Ok(())
        }
    }

    fn pending(specified_is_0: bool) -> PendingBackrun {
        PendingBackrun {
            recipient: Address::repeat_byte(0xaa),
            currency: Currency(Address::repeat_byte(if specified_is_0 { 1 } else { 2 })),
            specified_is_0,
        }
    }

    #[test]
    fn test_settlement_credits_specified_leg() {
        let mut ledger = RecordingLedger::default();
        let mut settlement = BackrunSettlement::new(pending(true));
        settlement
            .on_swap_settled(&mut ledger, BalanceDelta::new(400, -400))
            .unwrap();

        assert_eq!(
            ledger.minted,
            vec![(Address::repeat_byte(0xaa), Currency(Address::repeat_byte(1)), 400)]
        );
        assert_eq!(
            settlement.settled(),
            Some(SettledBackrun {
                credited: 400,
                unspecified: -400
            })
        );
    }

    #[test]
    fn test_settlement_decomposes_against_currency1() {
        let mut ledger = RecordingLedger::default();
        let mut settlement = BackrunSettlement::new(pending(false));
        settlement
            .on_swap_settled(&mut ledger, BalanceDelta::new(-75, 70))
            .unwrap();
        assert_eq!(ledger.minted[0].2, 70);
        assert_eq!(settlement.settled().unwrap().unspecified, -75);
    }

    #[test]
    #[should_panic(expected = "invoked more than once")]
    fn test_settlement_reentry_panics() {
        let mut ledger = RecordingLedger::default();
        let mut settlement = BackrunSettlement::new(pending(true));
        let _ = settlement.on_swap_settled(&mut ledger, BalanceDelta::new(1, -1));
        let _ = settlement.on_swap_settled(&mut ledger, BalanceDelta::new(1, -1));
    }

    #[test]
    #[should_panic(expected = "unexpected signs")]
    fn test_settlement_rejects_inverted_delta() {
        let mut ledger = RecordingLedger::default();
        let mut settlement = BackrunSettlement::new(pending(true));
        let _ = settlement.on_swap_settled(&mut ledger, BalanceDelta::new(-1, 1));
    }

    #[test]
    fn test_hook_delta_negates_unspecified() {
        let executed = BackrunOutcome::Executed {
            size: BackrunSize::Full {
                delta: 300,
                amount: 10,
            },
            recipient: Address::zero(),
            settlement: SettledBackrun {
                credited: 10,
                unspecified: -12,
            },
        };
        assert_eq!(executed.hook_delta(), 12);
        assert_eq!(BackrunOutcome::Skipped(BackrunSize::Skip { delta: 1 }).hook_delta(), 0);
    }
}
