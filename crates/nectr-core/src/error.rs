// crates/nectr-core/src/error.rs
//
// Error types for the Nectr staking ledger.
//
// `LedgerError` is what the engine returns: one variant per refusal the
// engine can make, each carrying the numbers that caused it. `NectrError`
// wraps it for the service layers (configuration, snapshots, RPC).

use thiserror::Error;

use crate::amount::Amount;
use crate::identity::AccountId;

/// Typed failures returned by ledger and engine operations.
///
/// A failed operation leaves the ledger exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Zero (or otherwise unusable) amount.
    #[error("Invalid amount: amounts must be greater than zero")]
    InvalidAmount,

    /// The lock duration does not match any configured APR tier.
    #[error("Unsupported duration: {duration_secs}s does not match any APR tier")]
    UnsupportedDuration { duration_secs: u64 },

    /// The account's free (or escrowed) balance is smaller than requested.
    #[error("Insufficient balance: have {available}, need {requested}")]
    InsufficientBalance { available: Amount, requested: Amount },

    /// No position exists at this index for the account.
    #[error("Position not found: {account} has no position #{position}")]
    PositionNotFound { account: AccountId, position: u64 },

    /// The position has already returned its principal.
    #[error("Position withdrawn: {account} position #{position} is closed")]
    PositionWithdrawn { account: AccountId, position: u64 },

    /// Minting would push total supply above the ceiling.
    #[error(
        "Supply ceiling exceeded: total supply {total_supply} + {requested} exceeds max {max_supply}"
    )]
    SupplyCeilingExceeded {
        total_supply: Amount,
        requested: Amount,
        max_supply: Amount,
    },

    /// A single mint request is larger than the per-call cap.
    #[error("Per-call mint cap exceeded: requested {requested}, cap {cap}")]
    PerCallCapExceeded { requested: Amount, cap: Amount },

    /// Minting would push the account's balance above the per-account cap.
    #[error("Account balance cap exceeded: balance {balance} + {requested} exceeds cap {cap}")]
    AccountBalanceCapExceeded {
        balance: Amount,
        requested: Amount,
        cap: Amount,
    },

    /// Rejected schedule or policy parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LedgerError {
    /// Stable name of the error kind, used on the wire so clients can map
    /// failures to messages without parsing the display text.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount => "InvalidAmount",
            LedgerError::UnsupportedDuration { .. } => "UnsupportedDuration",
            LedgerError::InsufficientBalance { .. } => "InsufficientBalance",
            LedgerError::PositionNotFound { .. } => "PositionNotFound",
            LedgerError::PositionWithdrawn { .. } => "PositionWithdrawn",
            LedgerError::SupplyCeilingExceeded { .. } => "SupplyCeilingExceeded",
            LedgerError::PerCallCapExceeded { .. } => "PerCallCapExceeded",
            LedgerError::AccountBalanceCapExceeded { .. } => "AccountBalanceCapExceeded",
            LedgerError::InvalidConfig(_) => "InvalidConfig",
        }
    }
}

/// Service-wide error type for the daemon, RPC server and CLI.
#[derive(Debug, Error)]
pub enum NectrError {
    /// An engine operation was refused.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Configuration file could not be loaded or is inconsistent.
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Snapshot read/write error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Malformed account address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed user input (amounts, flags).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport or protocol failure talking to the daemon.
    #[error("RPC error: {0}")]
    Rpc(String),
}

impl From<serde_json::Error> for NectrError {
    fn from(e: serde_json::Error) -> Self {
        NectrError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for NectrError {
    fn from(e: std::io::Error) -> Self {
        NectrError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant_name() {
        let account = AccountId::from_bytes([7u8; 20]);
        assert_eq!(LedgerError::InvalidAmount.kind(), "InvalidAmount");
        assert_eq!(
            LedgerError::PositionWithdrawn { account, position: 3 }.kind(),
            "PositionWithdrawn"
        );
        assert_eq!(
            LedgerError::PerCallCapExceeded { requested: 2, cap: 1 }.kind(),
            "PerCallCapExceeded"
        );
    }

    #[test]
    fn test_ledger_error_converts_into_nectr_error() {
        let err: NectrError = LedgerError::InvalidAmount.into();
        assert!(matches!(err, NectrError::Ledger(LedgerError::InvalidAmount)));
        assert_eq!(
            err.to_string(),
            "Invalid amount: amounts must be greater than zero"
        );
    }

    #[test]
    fn test_display_carries_numbers() {
        let err = LedgerError::InsufficientBalance {
            available: 10,
            requested: 25,
        };
        assert_eq!(err.to_string(), "Insufficient balance: have 10, need 25");
    }
}
