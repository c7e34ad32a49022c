// crates/nectr-daemon/src/main.rs
//
// Binary entrypoint for the NECTR ledger daemon.
//
// Parses CLI arguments, loads configuration, initializes tracing, restores
// the ledger snapshot, and serves the JSON-RPC API until interrupted.

mod config;
mod ledger;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use config::DaemonConfig;

use nectr_core::{Clock, MonotonicClock, Nectr, SystemClock};
use nectr_rpc::{LedgerRpcServer, RpcConfig, SharedLedger};

/// NECTR staking ledger daemon.
#[derive(Parser, Debug)]
#[command(name = "nectr-daemon", version = "0.1.0", about = "NECTR staking ledger service")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "~/.nectr/config.toml")]
    config: String,

    /// Override the configured RPC port.
    #[arg(long)]
    rpc_port: Option<u16>,

    /// Override the configured data directory.
    #[arg(long)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration comes first so its log level can seed the filter.
    let config_path = PathBuf::from(expand_tilde(&args.config));
    let loaded = DaemonConfig::load(&config_path)?;
    let found = loaded.is_some();
    let mut daemon_config = loaded.unwrap_or_default();

    if let Some(port) = args.rpc_port {
        daemon_config.rpc_port = port;
    }
    if let Some(dir) = args.data_dir {
        daemon_config.data_dir = dir;
    }

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&daemon_config.log_level)),
        )
        .init();

    if found {
        tracing::info!("Loaded configuration from {}", config_path.display());
    } else {
        tracing::warn!(
            "No configuration at {}. Using defaults.",
            config_path.display()
        );
    }

    tracing::info!("NECTR Ledger Daemon v0.1.0");
    tracing::info!("Data directory: {}", daemon_config.data_dir);
    tracing::info!(
        "RPC endpoint: {}:{}",
        daemon_config.rpc_host,
        daemon_config.rpc_port
    );

    let ledger_config = daemon_config.ledger.to_ledger_config()?;
    tracing::info!(
        "Supply ceiling: {}, per-call mint cap: {}, account cap: {}",
        Nectr::from_units(ledger_config.max_supply),
        Nectr::from_units(ledger_config.per_call_mint_cap),
        Nectr::from_units(ledger_config.account_balance_cap)
    );

    let snapshot_path = PathBuf::from(expand_tilde(&daemon_config.data_dir)).join("ledger.json");
    let state = if daemon_config.snapshot {
        ledger::open_ledger(ledger_config, Some(&snapshot_path))?
    } else {
        tracing::info!("Snapshots disabled; ledger state is in-memory only");
        ledger::open_ledger(ledger_config, None)?
    };

    for tier in state.schedule().tiers() {
        tracing::info!(
            "APR tier: {} days at {}.{:02}%",
            tier.duration_secs / nectr_core::SECONDS_PER_DAY,
            tier.rate_bps / 100,
            tier.rate_bps % 100
        );
    }

    let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new(SystemClock));
    let mut shared = SharedLedger::new(state, clock);
    if daemon_config.snapshot {
        shared = shared.with_snapshot_path(snapshot_path);
    }

    let server = LedgerRpcServer::new(
        RpcConfig {
            host: daemon_config.rpc_host.clone(),
            port: daemon_config.rpc_port,
        },
        shared,
    );

    tokio::select! {
        result = server.start() => {
            if let Err(e) = result {
                tracing::error!("RPC server error: {}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Expand a leading `~/` to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
