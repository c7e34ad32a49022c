// crates/nectr-rpc/src/handlers/token.rs
//
// Token handlers: Mint, Transfer, Burn, BalanceOf.

use serde::{Deserialize, Serialize};

use nectr_core::amount::as_string;
use nectr_core::{AccountId, Amount};
use nectr_ledger::{BalanceView, Operation, Outcome, Query, QueryResult};

use crate::server::RpcError;
use crate::shared::SharedLedger;

// ---------------------------------------------------------------------------
// Mint
// ---------------------------------------------------------------------------

/// Faucet-style mint, subject to the per-call, per-account, and supply caps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintRequest {
    pub account: AccountId,
    #[serde(with = "as_string")]
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintResponse {
    #[serde(with = "as_string")]
    pub amount: Amount,
    /// Free balance after the mint.
    #[serde(with = "as_string")]
    pub balance: Amount,
}

pub async fn handle_mint(
    ledger: &SharedLedger,
    request: MintRequest,
) -> Result<MintResponse, RpcError> {
    let outcome = ledger
        .apply(Operation::Mint {
            account: request.account,
            amount: request.amount,
        })
        .await?;
    match outcome {
        Outcome::Minted { amount, balance } => Ok(MintResponse { amount, balance }),
        other => Err(RpcError::unexpected(other)),
    }
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: AccountId,
    pub to: AccountId,
    #[serde(with = "as_string")]
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    #[serde(with = "as_string")]
    pub amount: Amount,
    /// Sender's free balance after the transfer.
    #[serde(with = "as_string")]
    pub balance: Amount,
}

pub async fn handle_transfer(
    ledger: &SharedLedger,
    request: TransferRequest,
) -> Result<TransferResponse, RpcError> {
    let outcome = ledger
        .apply(Operation::Transfer {
            from: request.from,
            to: request.to,
            amount: request.amount,
        })
        .await?;
    match outcome {
        Outcome::Transferred { amount, balance } => Ok(TransferResponse { amount, balance }),
        other => Err(RpcError::unexpected(other)),
    }
}

// ---------------------------------------------------------------------------
// Burn
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnRequest {
    pub account: AccountId,
    #[serde(with = "as_string")]
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnResponse {
    #[serde(with = "as_string")]
    pub amount: Amount,
    #[serde(with = "as_string")]
    pub total_supply: Amount,
}

pub async fn handle_burn(
    ledger: &SharedLedger,
    request: BurnRequest,
) -> Result<BurnResponse, RpcError> {
    let outcome = ledger
        .apply(Operation::Burn {
            account: request.account,
            amount: request.amount,
        })
        .await?;
    match outcome {
        Outcome::Burned {
            amount,
            total_supply,
        } => Ok(BurnResponse {
            amount,
            total_supply,
        }),
        other => Err(RpcError::unexpected(other)),
    }
}

// ---------------------------------------------------------------------------
// BalanceOf
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRequest {
    pub account: AccountId,
}

pub async fn handle_balance_of(
    ledger: &SharedLedger,
    request: BalanceRequest,
) -> Result<BalanceView, RpcError> {
    match ledger
        .query(Query::BalanceOf {
            account: request.account,
        })
        .await?
    {
        QueryResult::Balance(view) => Ok(view),
        other => Err(RpcError::unexpected(other)),
    }
}
