// crates/nectr-daemon/src/config.rs
//
// Runtime configuration for the NECTR ledger daemon.
// Loaded from a TOML file or populated with sensible defaults.
//
// Token quantities in the `[ledger]` table are whole NECTR; they are scaled
// to smallest units when the ledger config is built.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use nectr_core::{Amount, NectrError, SECONDS_PER_DAY, UNITS_PER_NECTR};
use nectr_ledger::{AprTier, LedgerConfig};

/// Runtime configuration for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding the ledger snapshot.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Host address for the RPC server.
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    /// Port for the RPC server.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// RUST_LOG takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Load `<data_dir>/ledger.json` on start-up and rewrite it after every
    /// successful mutation.
    #[serde(default = "default_snapshot")]
    pub snapshot: bool,

    /// Supply ceiling, mint caps, and APR tiers.
    #[serde(default)]
    pub ledger: LedgerSection,
}

/// The `[ledger]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSection {
    #[serde(default = "default_max_supply")]
    pub max_supply: u64,

    #[serde(default = "default_per_call_mint_cap")]
    pub per_call_mint_cap: u64,

    #[serde(default = "default_account_balance_cap")]
    pub account_balance_cap: u64,

    #[serde(default = "default_apr_tiers")]
    pub apr_tiers: Vec<TierEntry>,
}

/// One `[[ledger.apr_tiers]]` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TierEntry {
    pub days: u64,
    pub rate_bps: u32,
}

fn default_data_dir() -> String {
    "~/.nectr/data".to_string()
}

fn default_rpc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    50061
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_snapshot() -> bool {
    true
}

fn default_max_supply() -> u64 {
    10_000_000_000
}

fn default_per_call_mint_cap() -> u64 {
    1_000_000
}

fn default_account_balance_cap() -> u64 {
    1_000_000_000
}

fn default_apr_tiers() -> Vec<TierEntry> {
    [(30, 500), (90, 700), (180, 900), (365, 1_000), (730, 1_200)]
        .into_iter()
        .map(|(days, rate_bps)| TierEntry { days, rate_bps })
        .collect()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            log_level: default_log_level(),
            snapshot: default_snapshot(),
            ledger: LedgerSection::default(),
        }
    }
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            max_supply: default_max_supply(),
            per_call_mint_cap: default_per_call_mint_cap(),
            account_balance_cap: default_account_balance_cap(),
            apr_tiers: default_apr_tiers(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns `Ok(None)` if the file does not exist; a file that exists but
    /// cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Option<Self>, NectrError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents).map(Some)
    }

    pub fn parse(contents: &str) -> Result<Self, NectrError> {
        toml::from_str(contents).map_err(|e| NectrError::Config(e.to_string()))
    }
}

impl LedgerSection {
    /// Scale whole-NECTR quantities to smallest units and build the
    /// engine's config. Schedule and cap validation happens in the ledger.
    pub fn to_ledger_config(&self) -> Result<LedgerConfig, NectrError> {
        Ok(LedgerConfig {
            max_supply: whole_to_units("max_supply", self.max_supply)?,
            per_call_mint_cap: whole_to_units("per_call_mint_cap", self.per_call_mint_cap)?,
            account_balance_cap: whole_to_units("account_balance_cap", self.account_balance_cap)?,
            apr_tiers: self
                .apr_tiers
                .iter()
                .map(TierEntry::to_tier)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TierEntry {
    fn to_tier(&self) -> Result<AprTier, NectrError> {
        let duration_secs = self.days.checked_mul(SECONDS_PER_DAY).ok_or_else(|| {
            NectrError::Config(format!("ledger.apr_tiers: {} days is too long", self.days))
        })?;
        Ok(AprTier {
            duration_secs,
            rate_bps: self.rate_bps,
        })
    }
}

fn whole_to_units(key: &str, whole: u64) -> Result<Amount, NectrError> {
    u128::from(whole)
        .checked_mul(UNITS_PER_NECTR)
        .ok_or_else(|| NectrError::Config(format!("ledger.{} is too large: {}", key, whole)))
}
