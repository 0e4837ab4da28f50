//! Callback flags and acknowledgement tags

use ethers_core::utils::id;
use serde::Serialize;

/// Which engine callbacks the hook implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HookPermissions {
    pub before_initialize: bool,
    pub after_initialize: bool,
    pub before_add_liquidity: bool,
    pub after_add_liquidity: bool,
    pub before_remove_liquidity: bool,
    pub after_remove_liquidity: bool,
    pub before_swap: bool,
    pub after_swap: bool,
    pub before_donate: bool,
    pub after_donate: bool,
    pub before_swap_returns_delta: bool,
    pub after_swap_returns_delta: bool,
    pub after_add_liquidity_returns_delta: bool,
    pub after_remove_liquidity_returns_delta: bool,
}

impl HookPermissions {
    /// Flags in the engine's address-bit order, most significant first
    pub fn flags(&self) -> [bool; 14] {
        [
            self.before_initialize,
            self.after_initialize,
            self.before_add_liquidity,
            self.after_add_liquidity,
            self.before_remove_liquidity,
            self.after_remove_liquidity,
            self.before_swap,
            self.after_swap,
            self.before_donate,
            self.after_donate,
            self.before_swap_returns_delta,
            self.after_swap_returns_delta,
            self.after_add_liquidity_returns_delta,
            self.after_remove_liquidity_returns_delta,
        ]
    }

    /// Low 14 bits a hook address must carry to declare these permissions
    pub fn address_bits(&self) -> u16 {
        self.flags()
            .iter()
            .fold(0u16, |bits, &flag| (bits << 1) | u16::from(flag))
    }
}

const POOL_KEY: &str = "(address,address,uint24,int24,address)";

/// Acknowledgement returned from each callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HookCallback {
    BeforeInitialize,
    AfterInitialize,
    BeforeAddLiquidity,
    BeforeRemoveLiquidity,
    BeforeSwap,
    AfterSwap,
}

impl HookCallback {
    pub fn signature(&self) -> String {
        match self {
            HookCallback::BeforeInitialize => format!("beforeInitialize(address,{POOL_KEY},uint160)"),
            HookCallback::AfterInitialize => {
                format!("afterInitialize(address,{POOL_KEY},uint160,int24)")
            }
            HookCallback::BeforeAddLiquidity => format!(
                "beforeAddLiquidity(address,{POOL_KEY},(int24,int24,int256,bytes32),bytes)"
            ),
            HookCallback::BeforeRemoveLiquidity => format!(
                "beforeRemoveLiquidity(address,{POOL_KEY},(int24,int24,int256,bytes32),bytes)"
            ),
            HookCallback::BeforeSwap => {
                format!("beforeSwap(address,{POOL_KEY},(bool,int256,uint160),bytes)")
            }
            HookCallback::AfterSwap => {
                format!("afterSwap(address,{POOL_KEY},(bool,int256,uint160),int256,bytes)")
            }
        }
    }

    /// Four-byte selector the engine checks the callback's return against
    pub fn selector(&self) -> [u8; 4] {
        id(self.signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_match_engine_interface() {
        assert_eq!(HookCallback::BeforeInitialize.selector(), [0xdc, 0x98, 0x35, 0x4e]);
        assert_eq!(HookCallback::AfterInitialize.selector(), [0x6f, 0xe7, 0xe6, 0xeb]);
        assert_eq!(HookCallback::BeforeAddLiquidity.selector(), [0x25, 0x99, 0x82, 0xe5]);
        assert_eq!(HookCallback::BeforeRemoveLiquidity.selector(), [0x21, 0xd0, 0xee, 0x70]);
        assert_eq!(HookCallback::BeforeSwap.selector(), [0x57, 0x5e, 0x24, 0xb4]);
        assert_eq!(HookCallback::AfterSwap.selector(), [0xb4, 0x7b, 0x2f, 0xb1]);
    }

    #[test]
    fn test_address_bits() {
        let only_first = HookPermissions {
            before_initialize: true,
            ..Default::default()
        };
        assert_eq!(only_first.address_bits(), 1 << 13);

        let only_last = HookPermissions {
            after_remove_liquidity_returns_delta: true,
            ..Default::default()
        };
        assert_eq!(only_last.address_bits(), 1);
    }
}
