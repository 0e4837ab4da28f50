//! Pool identity
//!
//! A pool is defined by its sorted currency pair, fee, tick spacing and hook
//! address. [`PoolId`] is the keccak256 digest of the ABI-encoded key, so the
//! same parameters always map to the same identifier.

use crate::errors::TypesError;
use crate::tick::{MAX_TICK_SPACING, MIN_TICK_SPACING};
use ethers_core::abi::{self, Token};
use ethers_core::types::{Address, I256, U256};
use ethers_core::utils::keccak256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest fee representable in the engine's 24-bit fee field
pub const MAX_FEE: u32 = 0x00ff_ffff;

/// A token traded by a pool; the zero address denotes the native asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Currency(pub Address);

impl Currency {
    pub const NATIVE: Currency = Currency(Address::zero());

    pub fn address(&self) -> Address {
        self.0
    }

    pub fn is_native(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Address> for Currency {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Parameters that define a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    pub currency0: Currency,
    pub currency1: Currency,
    /// Fee in hundredths of a bip
    pub fee: u32,
    pub tick_spacing: i32,
    /// Address of the hook attached to the pool
    pub hooks: Address,
}

impl PoolKey {
    /// Build a key, rejecting unsorted currencies and out-of-range parameters
    pub fn new(
        currency0: Currency,
        currency1: Currency,
        fee: u32,
        tick_spacing: i32,
        hooks: Address,
    ) -> Result<Self, TypesError> {
        if currency0 >= currency1 {
            return Err(TypesError::CurrenciesOutOfOrder {
                currency0: currency0.to_string(),
                currency1: currency1.to_string(),
            });
        }
        if !(MIN_TICK_SPACING..=MAX_TICK_SPACING).contains(&tick_spacing) {
            return Err(TypesError::TickSpacingOutOfRange {
                tick_spacing,
                min: MIN_TICK_SPACING,
                max: MAX_TICK_SPACING,
            });
        }
        if fee > MAX_FEE {
            return Err(TypesError::FeeTooLarge { fee, max: MAX_FEE });
        }
        Ok(Self {
            currency0,
            currency1,
            fee,
            tick_spacing,
            hooks,
        })
    }

    /// Deterministic identifier for this key
    pub fn id(&self) -> PoolId {
        let encoded = abi::encode(&[
            Token::Address(self.currency0.0),
            Token::Address(self.currency1.0),
            Token::Uint(U256::from(self.fee)),
            Token::Int(I256::from(self.tick_spacing as i64).into_raw()),
            Token::Address(self.hooks),
        ]);
        PoolId(keccak256(encoded))
    }

    /// The currency on the given side of the pair
    pub fn currency(&self, zero: bool) -> Currency {
        if zero {
            self.currency0
        } else {
            self.currency1
        }
    }
}

/// Identifier of a pool, keccak256 of its ABI-encoded [`PoolKey`]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolId(pub [u8; 32]);

impl PoolId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<&PoolKey> for PoolId {
    fn from(key: &PoolKey) -> Self {
        key.id()
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps log lines readable
        write!(f, "PoolId(0x{}..)", hex::encode(&self.0[..6]))
    }
}
