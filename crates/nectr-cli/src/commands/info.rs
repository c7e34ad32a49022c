// crates/nectr-cli/src/commands/info.rs
//
// `nectr {tiers, stats}`: APR schedule and ledger-wide figures.

use serde_json::json;
use tabled::Tabled;

use nectr_ledger::{AprTier, Stats};
use nectr_rpc::handlers::info::AprTiersResponse;

use crate::output::{format_amount, format_bps, format_days, format_json, format_table, OutputFormat};
use crate::rpc_client::rpc_call;

/// A row in the APR tier table.
#[derive(Tabled)]
struct TierRow {
    #[tabled(rename = "Lock")]
    lock: String,
    #[tabled(rename = "APR")]
    apr: String,
}

impl From<&AprTier> for TierRow {
    fn from(tier: &AprTier) -> Self {
        Self {
            lock: format_days(tier.duration_secs),
            apr: format_bps(tier.rate_bps),
        }
    }
}

pub async fn tiers(rpc: &str, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let response: AprTiersResponse = rpc_call(rpc, "apr_tiers", json!({})).await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&response)),
        OutputFormat::Table => {
            let rows: Vec<TierRow> = response.tiers.iter().map(TierRow::from).collect();
            println!("{}", format_table(&rows));
        }
    }
    Ok(())
}

pub async fn stats(rpc: &str, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let stats: Stats = rpc_call(rpc, "stats", json!({})).await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&stats)),
        OutputFormat::Table => {
            println!("NECTR Ledger");
            println!("------------");
            println!("  Total supply:    {}", format_amount(stats.total_supply));
            println!("  Max supply:      {}", format_amount(stats.max_supply));
            println!("  Free:            {}", format_amount(stats.total_free));
            println!("  Total staked:    {}", format_amount(stats.total_staked));
            println!("  Active stakers:  {}", stats.active_stakers);
        }
    }
    Ok(())
}
