// crates/nectr-daemon/src/ledger.rs
//
// Start-up ledger construction: restore the snapshot if there is one, then
// bring it in line with the configured schedule and caps.

use std::path::Path;

use nectr_core::{Nectr, NectrError};
use nectr_ledger::{LedgerConfig, LedgerState};

/// Build the ledger the daemon will serve.
///
/// With `snapshot` set and a file present, balances and positions come from
/// the file and the schedule, mint policy, and supply ceiling come from
/// `config`. Open positions keep the rate they were opened with.
pub fn open_ledger(config: LedgerConfig, snapshot: Option<&Path>) -> Result<LedgerState, NectrError> {
    if let Some(path) = snapshot {
        if let Some(mut state) = LedgerState::load_snapshot(path)? {
            state.reconfigure(config)?;
            let stats = state.stats();
            tracing::info!(
                "Restored ledger from {}: supply {}, staked {}, {} active stakers",
                path.display(),
                Nectr::from_units(stats.total_supply),
                Nectr::from_units(stats.total_staked),
                stats.active_stakers
            );
            return Ok(state);
        }
        tracing::info!("No snapshot at {}; starting with an empty ledger", path.display());
    }
    Ok(LedgerState::new(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nectr_core::{AccountId, LedgerError, SECONDS_PER_DAY};
    use nectr_ledger::{AprTier, Operation};

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("nectr-daemon-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir.join("ledger.json")
    }

    #[test]
    fn test_fresh_ledger_without_snapshot() {
        let state = open_ledger(LedgerConfig::default(), None).unwrap();
        assert_eq!(state.token().total_supply(), 0);
    }

    #[test]
    fn test_snapshot_adopts_configured_schedule() {
        let path = scratch("restore");
        let account = AccountId::from_bytes([4u8; 20]);

        let mut state = LedgerState::default();
        state
            .apply(Operation::Mint { account, amount: 1_000 }, 0)
            .unwrap();
        state
            .apply(
                Operation::Stake {
                    account,
                    amount: 400,
                    duration_secs: 30 * SECONDS_PER_DAY,
                },
                0,
            )
            .unwrap();
        state.save_snapshot(&path).unwrap();

        let config = LedgerConfig {
            apr_tiers: vec![AprTier::days(60, 800)],
            ..LedgerConfig::default()
        };
        let restored = open_ledger(config, Some(&path)).unwrap();
        assert_eq!(restored.token().balance_of(&account), 600);
        assert_eq!(restored.positions().get(&account, 0).unwrap().apr_bps, 500);
        assert_eq!(restored.schedule().durations().collect::<Vec<_>>(), vec![60 * SECONDS_PER_DAY]);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_invalid_config_aborts() {
        let config = LedgerConfig {
            apr_tiers: vec![AprTier::days(30, 900), AprTier::days(90, 500)],
            ..LedgerConfig::default()
        };
        assert!(matches!(
            open_ledger(config, None),
            Err(NectrError::Ledger(LedgerError::InvalidConfig(_)))
        ));
    }
}
