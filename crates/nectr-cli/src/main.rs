// crates/nectr-cli/src/main.rs
//
// CLI entrypoint for the NECTR developer tools.
//
// Each subcommand is one JSON-RPC call against a running nectr-daemon.

mod commands;
mod output;
mod rpc_client;

use clap::{Parser, Subcommand};

use commands::parse_amount;
use nectr_core::{AccountId, Amount};
use output::OutputFormat;

/// NECTR CLI: balances, faucet minting, and staking against a nectr-daemon.
#[derive(Parser, Debug)]
#[command(name = "nectr", version = "0.1.0", about = "NECTR staking ledger CLI")]
struct Cli {
    /// RPC endpoint for the nectr-daemon.
    #[arg(long, global = true, default_value = "http://127.0.0.1:50061")]
    rpc: String,

    /// Print raw JSON instead of formatted output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands. Amounts are NECTR, e.g. `100` or `1.5`.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Show free and staked balance.
    Balance { account: AccountId },

    /// Mint tokens from the faucet.
    Mint {
        account: AccountId,
        #[arg(value_parser = parse_amount)]
        amount: Amount,
    },

    /// Move free tokens between accounts.
    Transfer {
        from: AccountId,
        to: AccountId,
        #[arg(value_parser = parse_amount)]
        amount: Amount,
    },

    /// Destroy free tokens.
    Burn {
        account: AccountId,
        #[arg(value_parser = parse_amount)]
        amount: Amount,
    },

    /// Lock tokens for one of the offered durations.
    Stake {
        account: AccountId,
        #[arg(value_parser = parse_amount)]
        amount: Amount,
        /// Lock duration in days (see `nectr tiers`).
        #[arg(long)]
        days: u64,
    },

    /// Claim accrued interest on a position.
    Claim { account: AccountId, position: u64 },

    /// Return a position's principal. Unclaimed interest is forfeited.
    Withdraw { account: AccountId, position: u64 },

    /// Show interest claimable on a position right now.
    Pending { account: AccountId, position: u64 },

    /// List an account's positions.
    Positions { account: AccountId },

    /// Show the APR schedule.
    Tiers,

    /// Show supply and staking totals.
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let rpc = cli.rpc.as_str();
    let format = OutputFormat::from_flag(cli.json);

    match &cli.command {
        Commands::Balance { account } => commands::account::balance(rpc, format, account).await?,
        Commands::Mint { account, amount } => {
            commands::account::mint(rpc, format, account, *amount).await?
        }
        Commands::Transfer { from, to, amount } => {
            commands::account::transfer(rpc, format, from, to, *amount).await?
        }
        Commands::Burn { account, amount } => {
            commands::account::burn(rpc, format, account, *amount).await?
        }
        Commands::Stake {
            account,
            amount,
            days,
        } => commands::stake::stake(rpc, format, account, *amount, *days).await?,
        Commands::Claim { account, position } => {
            commands::stake::claim(rpc, format, account, *position).await?
        }
        Commands::Withdraw { account, position } => {
            commands::stake::withdraw(rpc, format, account, *position).await?
        }
        Commands::Pending { account, position } => {
            commands::stake::pending(rpc, format, account, *position).await?
        }
        Commands::Positions { account } => {
            commands::stake::positions(rpc, format, account).await?
        }
        Commands::Tiers => commands::info::tiers(rpc, format).await?,
        Commands::Stats => commands::info::stats(rpc, format).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nectr_core::UNITS_PER_NECTR;

    const ALICE: &str = "0x00000000000000000000000000000000000a11ce";

    #[test]
    fn test_stake_args() {
        let cli = Cli::parse_from(["nectr", "stake", ALICE, "1.5", "--days", "90", "--json"]);
        assert!(cli.json);
        match cli.command {
            Commands::Stake {
                account,
                amount,
                days,
            } => {
                assert_eq!(account, ALICE.parse::<AccountId>().unwrap());
                assert_eq!(amount, 3 * UNITS_PER_NECTR / 2);
                assert_eq!(days, 90);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bad_address_is_rejected() {
        assert!(Cli::try_parse_from(["nectr", "balance", "0x1234"]).is_err());
    }

    #[test]
    fn test_bad_amount_is_rejected() {
        assert!(Cli::try_parse_from(["nectr", "mint", ALICE, "lots"]).is_err());
    }

    #[test]
    fn test_global_rpc_flag() {
        let cli = Cli::parse_from(["nectr", "--rpc", "http://10.0.0.5:7000", "stats"]);
        assert_eq!(cli.rpc, "http://10.0.0.5:7000");
        assert!(matches!(cli.command, Commands::Stats));
    }
}
