// crates/nectr-rpc/src/server.rs
//
// RPC server setup: LedgerRpcServer and RpcConfig.
//
// A single tonic unary service accepts JSON-encoded envelopes of the form
// `{ "method": ..., "params": {...} }`, decodes them into the closed
// `RpcRequest` enum, dispatches to the matching handler, and returns a
// JSON-encoded `JsonRpcResponse`. No proto codegen is involved; tonic
// provides the transport and interceptor plumbing.

use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tonic::transport::Server;
use tonic::Status;

use nectr_core::LedgerError;

use crate::handlers;
use crate::handlers::info::{AprForRequest, EmptyParams};
use crate::handlers::staking::{PositionRequest, PositionsRequest, StakeRequest};
use crate::handlers::token::{BalanceRequest, BurnRequest, MintRequest, TransferRequest};
use crate::middleware;
use crate::shared::SharedLedger;

/// HTTP path clients POST envelopes to.
pub const CALL_PATH: &str = "/nectr.rpc.LedgerService/Call";

// ---------------------------------------------------------------------------
// RpcConfig
// ---------------------------------------------------------------------------

/// Configuration for the RPC server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Host to bind to (e.g., "127.0.0.1" or "0.0.0.0").
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 50061,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON-RPC Envelope
// ---------------------------------------------------------------------------

/// Every method the service understands, with its typed params.
///
/// Decoded straight from the `{ method, params }` envelope, so an unknown
/// method or malformed params never reach a handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum RpcRequest {
    Stake(StakeRequest),
    ClaimInterest(PositionRequest),
    Withdraw(PositionRequest),
    Mint(MintRequest),
    Transfer(TransferRequest),
    Burn(BurnRequest),
    BalanceOf(BalanceRequest),
    Positions(PositionsRequest),
    PendingInterest(PositionRequest),
    AprFor(AprForRequest),
    AprTiers(EmptyParams),
    Stats(EmptyParams),
}

impl RpcRequest {
    pub fn method(&self) -> &'static str {
        match self {
            RpcRequest::Stake(_) => "stake",
            RpcRequest::ClaimInterest(_) => "claim_interest",
            RpcRequest::Withdraw(_) => "withdraw",
            RpcRequest::Mint(_) => "mint",
            RpcRequest::Transfer(_) => "transfer",
            RpcRequest::Burn(_) => "burn",
            RpcRequest::BalanceOf(_) => "balance_of",
            RpcRequest::Positions(_) => "positions",
            RpcRequest::PendingInterest(_) => "pending_interest",
            RpcRequest::AprFor(_) => "apr_for",
            RpcRequest::AprTiers(_) => "apr_tiers",
            RpcRequest::Stats(_) => "stats",
        }
    }
}

/// Error half of the response envelope.
///
/// `kind` is stable: ledger refusals use the ledger error's kind name
/// (e.g. "PositionWithdrawn"); envelope problems use "InvalidRequest".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub kind: String,
    pub message: String,
}

impl RpcError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: "InvalidRequest".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: "Internal".to_string(),
            message: message.into(),
        }
    }

    /// A ledger answer of the wrong shape for the request.
    pub(crate) fn unexpected(value: impl std::fmt::Debug) -> Self {
        Self::internal(format!("unexpected ledger result: {:?}", value))
    }
}

impl From<LedgerError> for RpcError {
    fn from(e: LedgerError) -> Self {
        Self {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// A JSON-RPC-style response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// The result data (if success).
    pub result: Option<serde_json::Value>,
    /// What went wrong (if not success).
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    pub fn ok(value: serde_json::Value) -> Self {
        Self {
            success: true,
            result: Some(value),
            error: None,
        }
    }

    pub fn err(error: RpcError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error),
        }
    }
}

// ---------------------------------------------------------------------------
// LedgerRpcServer
// ---------------------------------------------------------------------------

/// The RPC server for the NECTR ledger.
#[derive(Debug, Clone)]
pub struct LedgerRpcServer {
    config: RpcConfig,
    ledger: SharedLedger,
}

impl LedgerRpcServer {
    pub fn new(config: RpcConfig, ledger: SharedLedger) -> Self {
        Self { config, ledger }
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Start the RPC server and listen for requests.
    ///
    /// Binds to the configured address and serves until the process is
    /// terminated or the returned future is dropped.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.host, self.config.port).parse()?;

        tracing::info!("NECTR RPC server starting on {}", addr);

        Server::builder()
            .accept_http1(true)
            .add_service(tonic::service::interceptor::InterceptedService::new(
                LedgerJsonRpcService::new(self.clone()),
                middleware::logging_interceptor,
            ))
            .serve(addr)
            .await?;

        Ok(())
    }

    /// Decode a raw request body and dispatch it.
    pub async fn handle_json(&self, body: &[u8]) -> JsonRpcResponse {
        match serde_json::from_slice::<RpcRequest>(body) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected malformed RPC request");
                JsonRpcResponse::err(RpcError::invalid_request(format!(
                    "Invalid JSON-RPC request: {}",
                    e
                )))
            }
        }
    }

    /// Dispatch a typed request to its handler.
    pub async fn dispatch(&self, request: RpcRequest) -> JsonRpcResponse {
        let method = request.method();
        let ledger = &self.ledger;

        let result = match request {
            // Staking
            RpcRequest::Stake(r) => to_json(handlers::staking::handle_stake(ledger, r).await),
            RpcRequest::ClaimInterest(r) => {
                to_json(handlers::staking::handle_claim_interest(ledger, r).await)
            }
            RpcRequest::Withdraw(r) => to_json(handlers::staking::handle_withdraw(ledger, r).await),
            RpcRequest::Positions(r) => {
                to_json(handlers::staking::handle_positions(ledger, r).await)
            }
            RpcRequest::PendingInterest(r) => {
                to_json(handlers::staking::handle_pending_interest(ledger, r).await)
            }

            // Token
            RpcRequest::Mint(r) => to_json(handlers::token::handle_mint(ledger, r).await),
            RpcRequest::Transfer(r) => to_json(handlers::token::handle_transfer(ledger, r).await),
            RpcRequest::Burn(r) => to_json(handlers::token::handle_burn(ledger, r).await),
            RpcRequest::BalanceOf(r) => {
                to_json(handlers::token::handle_balance_of(ledger, r).await)
            }

            // Info
            RpcRequest::AprFor(r) => to_json(handlers::info::handle_apr_for(ledger, r).await),
            RpcRequest::AprTiers(r) => to_json(handlers::info::handle_apr_tiers(ledger, r).await),
            RpcRequest::Stats(r) => to_json(handlers::info::handle_stats(ledger, r).await),
        };

        match result {
            Ok(value) => JsonRpcResponse::ok(value),
            Err(error) => {
                tracing::debug!(method, kind = %error.kind, "RPC call failed: {}", error.message);
                JsonRpcResponse::err(error)
            }
        }
    }
}

/// Serialize a handler result into the envelope's `result` value.
fn to_json<Resp: Serialize>(result: Result<Resp, RpcError>) -> Result<serde_json::Value, RpcError> {
    let response = result?;
    serde_json::to_value(response)
        .map_err(|e| RpcError::internal(format!("Failed to serialize response: {}", e)))
}

// ---------------------------------------------------------------------------
// Tonic Service Wiring
// ---------------------------------------------------------------------------
// One service, one method (`Call`). Request and response bodies are raw
// JSON bytes rather than protobuf messages.

/// Low-level tonic service: reads the body, dispatches, writes JSON back.
#[derive(Clone)]
pub struct LedgerJsonRpcService {
    inner: LedgerRpcServer,
}

impl std::fmt::Debug for LedgerJsonRpcService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerJsonRpcService").finish()
    }
}

impl LedgerJsonRpcService {
    fn new(inner: LedgerRpcServer) -> Self {
        Self { inner }
    }
}

impl tonic::server::NamedService for LedgerJsonRpcService {
    const NAME: &'static str = "nectr.rpc.LedgerService";
}

impl<B> tower_service::Service<http::Request<B>> for LedgerJsonRpcService
where
    B: HttpBody + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    B::Data: Send,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = std::convert::Infallible;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let inner = self.inner.clone();

        Box::pin(async move {
            let rpc_response = match req.into_body().collect().await {
                Ok(collected) => inner.handle_json(&collected.to_bytes()).await,
                Err(e) => {
                    let e: Box<dyn std::error::Error + Send + Sync> = e.into();
                    tracing::error!("Failed to read request body: {}", e);
                    JsonRpcResponse::err(RpcError::invalid_request(format!(
                        "Failed to read request body: {}",
                        e
                    )))
                }
            };
            let json = serde_json::to_vec(&rpc_response).unwrap_or_default();
            Ok(build_response(json))
        })
    }
}

/// Build an HTTP response with the given JSON body.
fn build_response(json: Vec<u8>) -> http::Response<tonic::body::BoxBody> {
    let body = tonic::body::BoxBody::new(
        http_body_util::Full::new(bytes::Bytes::from(json))
            .map_err(|e| Status::internal(format!("body error: {}", e))),
    );

    let mut response = http::Response::new(body);
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use nectr_core::AccountId;

    #[test]
    fn test_request_envelope_decodes_by_method() {
        let json = r#"{
            "method": "stake",
            "params": {
                "account": "0x0101010101010101010101010101010101010101",
                "amount": "340282366920938463463374607431768211455",
                "duration_secs": 2592000
            }
        }"#;
        let request: RpcRequest = serde_json::from_str(json).unwrap();
        match request {
            RpcRequest::Stake(r) => {
                assert_eq!(r.account, AccountId::from_bytes([1u8; 20]));
                assert_eq!(r.amount, u128::MAX);
                assert_eq!(r.duration_secs, 2_592_000);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unit_methods_take_empty_params() {
        let request: RpcRequest =
            serde_json::from_str(r#"{"method":"stats","params":{}}"#).unwrap();
        assert_eq!(request.method(), "stats");
    }

    #[test]
    fn test_unknown_method_fails_to_decode() {
        let result = serde_json::from_str::<RpcRequest>(r#"{"method":"approve","params":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_ledger_error_maps_to_kind() {
        let error = RpcError::from(LedgerError::InvalidAmount);
        assert_eq!(error.kind, "InvalidAmount");
        assert!(error.message.contains("greater than zero"));
    }

    #[test]
    fn test_call_path_is_under_service_name() {
        use tonic::server::NamedService;
        assert!(CALL_PATH.starts_with(&format!("/{}/", LedgerJsonRpcService::NAME)));
    }

    #[test]
    fn test_build_response_sets_content_type() {
        let response = build_response(b"{}".to_vec());
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
