// crates/nectr-cli/src/rpc_client.rs
//
// Lightweight JSON-RPC client that POSTs to the nectr-daemon HTTP endpoint.

use serde::de::DeserializeOwned;
use serde::Serialize;

use nectr_core::NectrError;
use nectr_rpc::{JsonRpcResponse, CALL_PATH};

/// Mirrors the server's request envelope.
#[derive(Debug, Clone, Serialize)]
struct JsonRpcRequest<'a, P> {
    method: &'a str,
    params: P,
}

/// Send a JSON-RPC call to the daemon and decode its result as `T`.
///
/// A refused call surfaces as `NectrError::Rpc` carrying the server's error
/// kind and message.
pub async fn rpc_call<P, T>(
    endpoint: &str,
    method: &str,
    params: P,
) -> Result<T, Box<dyn std::error::Error>>
where
    P: Serialize,
    T: DeserializeOwned,
{
    let request = JsonRpcRequest { method, params };
    let url = format!("{}{}", endpoint.trim_end_matches('/'), CALL_PATH);

    let client = reqwest::Client::new();
    let resp = client.post(&url).json(&request).send().await?;
    let rpc_response: JsonRpcResponse = resp.json().await?;

    Ok(decode(rpc_response)?)
}

fn decode<T: DeserializeOwned>(response: JsonRpcResponse) -> Result<T, NectrError> {
    if !response.success {
        let message = match response.error {
            Some(e) => format!("{}: {}", e.kind, e.message),
            None => "request failed without an error message".to_string(),
        };
        return Err(NectrError::Rpc(message));
    }
    let result = response
        .result
        .ok_or_else(|| NectrError::Rpc("response has no result".to_string()))?;
    Ok(serde_json::from_value(result)?)
}
