// crates/nectr-core/src/identity.rs
//
// Account identifiers.
//
// Accounts are 20-byte addresses written as 0x-prefixed hex, the form the
// wallet layer hands us. The ledger trusts whatever identity the caller
// supplies; authentication happens before a request reaches it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NectrError;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// An account address on the ledger.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; ADDRESS_LEN]);

impl AccountId {
    /// Build an account id from raw address bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl FromStr for AccountId {
    type Err = NectrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(NectrError::InvalidAddress(format!(
                "expected {} hex digits, got {} in {:?}",
                ADDRESS_LEN * 2,
                digits.len(),
                s
            )));
        }
        let bytes = hex::decode(digits)
            .map_err(|e| NectrError::InvalidAddress(format!("{:?}: {}", s, e)))?;
        let mut arr = [0u8; ADDRESS_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self)
    }
}

// Serialized as the 0x-hex string so it can key JSON maps.
impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
