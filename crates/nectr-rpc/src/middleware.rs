// crates/nectr-rpc/src/middleware.rs
//
// Request interceptor for the RPC server.

use tonic::{Request, Status};

/// Logs each incoming request before it reaches the ledger service.
pub fn logging_interceptor(req: Request<()>) -> Result<Request<()>, Status> {
    let user_agent = req
        .metadata()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info!(
        user_agent,
        remote = ?req.remote_addr(),
        "Incoming RPC request"
    );
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interceptor_passes_request_through() {
        let mut req = Request::new(());
        req.metadata_mut()
            .insert("user-agent", "nectr-cli".parse().unwrap());
        let out = logging_interceptor(req).unwrap();
        assert_eq!(
            out.metadata().get("user-agent").unwrap().to_str().unwrap(),
            "nectr-cli"
        );
    }
}
