// crates/nectr-cli/src/commands/account.rs
//
// `nectr {balance, mint, transfer, burn}`: token balance commands.

use serde_json::json;

use nectr_core::{AccountId, Amount};
use nectr_ledger::BalanceView;
use nectr_rpc::handlers::token::{BurnResponse, MintResponse, TransferResponse};

use crate::output::{format_amount, format_json, OutputFormat};
use crate::rpc_client::rpc_call;

pub async fn balance(
    rpc: &str,
    format: OutputFormat,
    account: &AccountId,
) -> Result<(), Box<dyn std::error::Error>> {
    let view: BalanceView = rpc_call(rpc, "balance_of", json!({ "account": account })).await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&view)),
        OutputFormat::Table => {
            println!("Account:  {}", view.account);
            println!("  Free:     {}", format_amount(view.free));
            println!("  Staked:   {}", format_amount(view.escrowed));
            println!("  Total:    {}", format_amount(view.free.saturating_add(view.escrowed)));
        }
    }
    Ok(())
}

pub async fn mint(
    rpc: &str,
    format: OutputFormat,
    account: &AccountId,
    amount: Amount,
) -> Result<(), Box<dyn std::error::Error>> {
    let response: MintResponse = rpc_call(
        rpc,
        "mint",
        json!({ "account": account, "amount": amount.to_string() }),
    )
    .await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&response)),
        OutputFormat::Table => {
            println!("Minted {} to {}", format_amount(response.amount), account);
            println!("  New balance: {}", format_amount(response.balance));
        }
    }
    Ok(())
}

pub async fn transfer(
    rpc: &str,
    format: OutputFormat,
    from: &AccountId,
    to: &AccountId,
    amount: Amount,
) -> Result<(), Box<dyn std::error::Error>> {
    let response: TransferResponse = rpc_call(
        rpc,
        "transfer",
        json!({ "from": from, "to": to, "amount": amount.to_string() }),
    )
    .await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&response)),
        OutputFormat::Table => {
            println!("Transferred {} from {} to {}", format_amount(response.amount), from, to);
            println!("  Sender balance: {}", format_amount(response.balance));
        }
    }
    Ok(())
}

pub async fn burn(
    rpc: &str,
    format: OutputFormat,
    account: &AccountId,
    amount: Amount,
) -> Result<(), Box<dyn std::error::Error>> {
    let response: BurnResponse = rpc_call(
        rpc,
        "burn",
        json!({ "account": account, "amount": amount.to_string() }),
    )
    .await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&response)),
        OutputFormat::Table => {
            println!("Burned {} from {}", format_amount(response.amount), account);
            println!("  Total supply: {}", format_amount(response.total_supply));
        }
    }
    Ok(())
}
