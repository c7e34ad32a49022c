// crates/nectr-rpc/src/handlers/staking.rs
//
// Staking handlers: Stake, ClaimInterest, Withdraw, Positions, PendingInterest.

use serde::{Deserialize, Serialize};

use nectr_core::amount::as_string;
use nectr_core::{AccountId, Amount, Timestamp};
use nectr_ledger::{Operation, Outcome, PositionId, PositionView, Query, QueryResult};

use crate::server::RpcError;
use crate::shared::SharedLedger;

// ---------------------------------------------------------------------------
// Stake
// ---------------------------------------------------------------------------

/// Request to lock tokens for one of the configured durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeRequest {
    pub account: AccountId,
    /// Principal in smallest units.
    #[serde(with = "as_string")]
    pub amount: Amount,
    /// Lock duration in seconds. Must match an APR tier exactly.
    pub duration_secs: u64,
}

/// Response from a stake operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeResponse {
    /// Index of the new position within the account's list.
    pub position: PositionId,
    #[serde(with = "as_string")]
    pub amount: Amount,
    pub apr_bps: u32,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

pub async fn handle_stake(
    ledger: &SharedLedger,
    request: StakeRequest,
) -> Result<StakeResponse, RpcError> {
    let outcome = ledger
        .apply(Operation::Stake {
            account: request.account,
            amount: request.amount,
            duration_secs: request.duration_secs,
        })
        .await?;
    match outcome {
        Outcome::Staked {
            position,
            amount,
            apr_bps,
            start_time,
            end_time,
        } => Ok(StakeResponse {
            position,
            amount,
            apr_bps,
            start_time,
            end_time,
        }),
        other => Err(RpcError::unexpected(other)),
    }
}

// ---------------------------------------------------------------------------
// ClaimInterest / Withdraw
// ---------------------------------------------------------------------------

/// Identifies one position. Shared by claim, withdraw, and pending-interest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRequest {
    pub account: AccountId,
    pub position: PositionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimInterestResponse {
    pub position: PositionId,
    /// Interest paid by this call. Zero if nothing had accrued.
    #[serde(with = "as_string")]
    pub paid: Amount,
}

pub async fn handle_claim_interest(
    ledger: &SharedLedger,
    request: PositionRequest,
) -> Result<ClaimInterestResponse, RpcError> {
    let outcome = ledger
        .apply(Operation::ClaimInterest {
            account: request.account,
            position: request.position,
        })
        .await?;
    match outcome {
        Outcome::InterestClaimed { position, paid } => {
            Ok(ClaimInterestResponse { position, paid })
        }
        other => Err(RpcError::unexpected(other)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub position: PositionId,
    /// Principal returned to the free balance.
    #[serde(with = "as_string")]
    pub principal: Amount,
}

pub async fn handle_withdraw(
    ledger: &SharedLedger,
    request: PositionRequest,
) -> Result<WithdrawResponse, RpcError> {
    let outcome = ledger
        .apply(Operation::Withdraw {
            account: request.account,
            position: request.position,
        })
        .await?;
    match outcome {
        Outcome::Withdrawn {
            position,
            principal,
        } => Ok(WithdrawResponse {
            position,
            principal,
        }),
        other => Err(RpcError::unexpected(other)),
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionsRequest {
    pub account: AccountId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionsResponse {
    pub account: AccountId,
    /// As of this service time.
    pub now: Timestamp,
    pub positions: Vec<PositionView>,
}

pub async fn handle_positions(
    ledger: &SharedLedger,
    request: PositionsRequest,
) -> Result<PositionsResponse, RpcError> {
    let (now, result) = ledger
        .query_timed(Query::PositionsOf {
            account: request.account,
        })
        .await?;
    match result {
        QueryResult::Positions(positions) => Ok(PositionsResponse {
            account: request.account,
            now,
            positions,
        }),
        other => Err(RpcError::unexpected(other)),
    }
}

// ---------------------------------------------------------------------------
// PendingInterest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingInterestResponse {
    pub position: PositionId,
    #[serde(with = "as_string")]
    pub pending: Amount,
}

pub async fn handle_pending_interest(
    ledger: &SharedLedger,
    request: PositionRequest,
) -> Result<PendingInterestResponse, RpcError> {
    let result = ledger
        .query(Query::PendingInterest {
            account: request.account,
            position: request.position,
        })
        .await?;
    match result {
        QueryResult::PendingInterest { position, amount } => Ok(PendingInterestResponse {
            position,
            pending: amount,
        }),
        other => Err(RpcError::unexpected(other)),
    }
}
