// crates/nectr-rpc/src/lib.rs
//
// nectr-rpc: JSON-RPC server and handlers for the NECTR staking ledger.
//
// A single tonic service accepts JSON envelopes over HTTP, decodes them into
// a closed set of typed requests, and runs each against the shared ledger.

pub mod handlers;
pub mod middleware;
pub mod server;
pub mod shared;

// Re-export the main server types for ergonomic access.
pub use server::{JsonRpcResponse, CALL_PATH, LedgerRpcServer, RpcConfig, RpcError, RpcRequest};
pub use shared::SharedLedger;
