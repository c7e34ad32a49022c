// crates/nectr-cli/src/commands/stake.rs
//
// `nectr {stake, claim, withdraw, positions, pending}`: staking commands.

use serde_json::json;
use tabled::Tabled;

use nectr_core::{AccountId, Amount, SECONDS_PER_DAY};
use nectr_ledger::{PositionStatus, PositionView};
use nectr_rpc::handlers::staking::{
    ClaimInterestResponse, PendingInterestResponse, PositionsResponse, StakeResponse,
    WithdrawResponse,
};

use crate::output::{
    format_amount, format_bps, format_json, format_table, format_timestamp, OutputFormat,
};
use crate::rpc_client::rpc_call;

/// A row in the positions table.
#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "APR")]
    apr: String,
    #[tabled(rename = "Matures")]
    matures: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Claimed")]
    claimed: String,
    #[tabled(rename = "Pending")]
    pending: String,
}

impl From<&PositionView> for PositionRow {
    fn from(view: &PositionView) -> Self {
        let status = match view.status {
            PositionStatus::Active => format!("Active ({}d left)", view.seconds_remaining.div_ceil(SECONDS_PER_DAY)),
            PositionStatus::Matured => "Matured".to_string(),
            PositionStatus::Withdrawn => "Withdrawn".to_string(),
        };
        Self {
            id: view.id,
            amount: format_amount(view.amount),
            apr: format_bps(view.apr_bps),
            matures: format_timestamp(view.end_time),
            status,
            progress: format_bps(view.progress_bps),
            claimed: format_amount(view.claimed_interest),
            pending: format_amount(view.pending_interest),
        }
    }
}

pub async fn stake(
    rpc: &str,
    format: OutputFormat,
    account: &AccountId,
    amount: Amount,
    days: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let duration_secs = days
        .checked_mul(SECONDS_PER_DAY)
        .ok_or_else(|| format!("--days {} is out of range", days))?;
    let response: StakeResponse = rpc_call(
        rpc,
        "stake",
        json!({
            "account": account,
            "amount": amount.to_string(),
            "duration_secs": duration_secs,
        }),
    )
    .await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&response)),
        OutputFormat::Table => {
            println!("Opened position #{} for {}", response.position, account);
            println!("  Amount:   {}", format_amount(response.amount));
            println!("  APR:      {}", format_bps(response.apr_bps));
            println!("  Matures:  {}", format_timestamp(response.end_time));
        }
    }
    Ok(())
}

pub async fn claim(
    rpc: &str,
    format: OutputFormat,
    account: &AccountId,
    position: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let response: ClaimInterestResponse = rpc_call(
        rpc,
        "claim_interest",
        json!({ "account": account, "position": position }),
    )
    .await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&response)),
        OutputFormat::Table => {
            if response.paid == 0 {
                println!("No interest to claim on position #{}", response.position);
            } else {
                println!(
                    "Claimed {} from position #{}",
                    format_amount(response.paid),
                    response.position
                );
            }
        }
    }
    Ok(())
}

pub async fn withdraw(
    rpc: &str,
    format: OutputFormat,
    account: &AccountId,
    position: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let response: WithdrawResponse = rpc_call(
        rpc,
        "withdraw",
        json!({ "account": account, "position": position }),
    )
    .await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&response)),
        OutputFormat::Table => {
            println!(
                "Withdrew {} from position #{}",
                format_amount(response.principal),
                response.position
            );
            println!("Unclaimed interest on this position has been forfeited.");
        }
    }
    Ok(())
}

pub async fn pending(
    rpc: &str,
    format: OutputFormat,
    account: &AccountId,
    position: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let response: PendingInterestResponse = rpc_call(
        rpc,
        "pending_interest",
        json!({ "account": account, "position": position }),
    )
    .await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&response)),
        OutputFormat::Table => println!(
            "Position #{}: {} claimable",
            response.position,
            format_amount(response.pending)
        ),
    }
    Ok(())
}

pub async fn positions(
    rpc: &str,
    format: OutputFormat,
    account: &AccountId,
) -> Result<(), Box<dyn std::error::Error>> {
    let response: PositionsResponse =
        rpc_call(rpc, "positions", json!({ "account": account })).await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&response)),
        OutputFormat::Table => {
            println!("Positions for {} as of {}", response.account, format_timestamp(response.now));
            if response.positions.is_empty() {
                println!("  (none)");
            } else {
                let rows: Vec<PositionRow> = response.positions.iter().map(PositionRow::from).collect();
                println!("{}", format_table(&rows));
            }
        }
    }
    Ok(())
}
