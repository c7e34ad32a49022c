// crates/nectr-rpc/src/handlers/info.rs
//
// Read-only handlers: AprFor, AprTiers, Stats.

use serde::{Deserialize, Serialize};

use nectr_ledger::{AprTier, Query, QueryResult, Stats};

use crate::server::RpcError;
use crate::shared::SharedLedger;

/// Params for methods that take none. Clients send `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmptyParams {}

// ---------------------------------------------------------------------------
// AprFor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AprForRequest {
    pub duration_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AprForResponse {
    pub duration_secs: u64,
    pub rate_bps: u32,
}

pub async fn handle_apr_for(
    ledger: &SharedLedger,
    request: AprForRequest,
) -> Result<AprForResponse, RpcError> {
    match ledger
        .query(Query::AprFor {
            duration_secs: request.duration_secs,
        })
        .await?
    {
        QueryResult::Apr {
            duration_secs,
            rate_bps,
        } => Ok(AprForResponse {
            duration_secs,
            rate_bps,
        }),
        other => Err(RpcError::unexpected(other)),
    }
}

// ---------------------------------------------------------------------------
// AprTiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AprTiersResponse {
    pub tiers: Vec<AprTier>,
}

pub async fn handle_apr_tiers(
    ledger: &SharedLedger,
    _request: EmptyParams,
) -> Result<AprTiersResponse, RpcError> {
    match ledger.query(Query::AprTiers).await? {
        QueryResult::Tiers(tiers) => Ok(AprTiersResponse { tiers }),
        other => Err(RpcError::unexpected(other)),
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

pub async fn handle_stats(ledger: &SharedLedger, _request: EmptyParams) -> Result<Stats, RpcError> {
    match ledger.query(Query::Stats).await? {
        QueryResult::Stats(stats) => Ok(stats),
        other => Err(RpcError::unexpected(other)),
    }
}
