// crates/nectr-rpc/src/shared.rs
//
// SharedLedger: the one ledger instance the RPC handlers operate on.
//
// The state sits behind a single tokio Mutex. Mutations read the clock and
// apply while holding the lock, so the `now` seen by consecutive operations
// never goes backwards and operations on an account are totally ordered.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use nectr_core::{Clock, LedgerError, NectrError, Timestamp};
use nectr_ledger::snapshot::snapshot_tmp_path;
use nectr_ledger::{LedgerState, Operation, Outcome, Query, QueryResult};

/// Cloneable handle to the shared ledger state.
#[derive(Clone)]
pub struct SharedLedger {
    state: Arc<Mutex<LedgerState>>,
    clock: Arc<dyn Clock>,
    /// Where to write a snapshot after each successful mutation.
    snapshot_path: Option<PathBuf>,
}

impl std::fmt::Debug for SharedLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedLedger")
            .field("snapshot_path", &self.snapshot_path)
            .finish()
    }
}

impl SharedLedger {
    pub fn new(state: LedgerState, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            clock,
            snapshot_path: None,
        }
    }

    /// Persist the state to `path` after every successful mutation.
    pub fn with_snapshot_path(mut self, path: PathBuf) -> Self {
        self.snapshot_path = Some(path);
        self
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Apply a mutating operation at the service clock's current time.
    ///
    /// A snapshot failure is logged but does not fail the operation; the
    /// in-memory state stays authoritative and the next save retries.
    /// The lock is held across the write so snapshots land in apply order.
    pub async fn apply(&self, op: Operation) -> Result<Outcome, LedgerError> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let outcome = state.apply(op, now)?;

        if let Some(path) = &self.snapshot_path {
            if let Err(e) = write_snapshot(&state, path).await {
                tracing::error!(path = %path.display(), error = %e, "Failed to save ledger snapshot");
            }
        }
        Ok(outcome)
    }

    /// Answer a read-only query at the service clock's current time.
    pub async fn query(&self, query: Query) -> Result<QueryResult, LedgerError> {
        self.query_timed(query).await.map(|(_, result)| result)
    }

    /// Like `query`, also returning the time the answer was computed at.
    pub async fn query_timed(&self, query: Query) -> Result<(Timestamp, QueryResult), LedgerError> {
        let state = self.state.lock().await;
        let now = self.clock.now();
        Ok((now, state.query(query, now)?))
    }

    /// Run `f` against the locked state. Used for consistency checks.
    pub async fn inspect<R>(&self, f: impl FnOnce(&LedgerState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }
}

/// Non-blocking counterpart of `LedgerState::save_snapshot`: same temp file
/// and rename, but through `tokio::fs`.
async fn write_snapshot(state: &LedgerState, path: &Path) -> Result<(), NectrError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let bytes = state.snapshot_bytes()?;
    let tmp = snapshot_tmp_path(path);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    tracing::debug!(path = %path.display(), "Saved ledger snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nectr_core::{AccountId, ManualClock};

    #[tokio::test]
    async fn test_apply_uses_service_clock() {
        let clock = Arc::new(ManualClock::new(1_000));
        let ledger = SharedLedger::new(LedgerState::default(), clock.clone());
        let account = AccountId::from_bytes([1u8; 20]);

        ledger
            .apply(Operation::Mint {
                account,
                amount: 100,
            })
            .await
            .unwrap();
        clock.advance(5);
        let outcome = ledger
            .apply(Operation::Stake {
                account,
                amount: 100,
                duration_secs: 30 * 86_400,
            })
            .await
            .unwrap();
        match outcome {
            Outcome::Staked { start_time, .. } => assert_eq!(start_time, 1_005),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_apply_writes_snapshot_without_leftover_tmp() {
        let dir = std::env::temp_dir().join(format!("nectr-shared-snapshot-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("ledger.json");

        let clock = Arc::new(ManualClock::new(0));
        let ledger =
            SharedLedger::new(LedgerState::default(), clock).with_snapshot_path(path.clone());
        let account = AccountId::from_bytes([3u8; 20]);
        for _ in 0..3 {
            ledger
                .apply(Operation::Mint {
                    account,
                    amount: 7,
                })
                .await
                .unwrap();
        }

        assert!(!snapshot_tmp_path(&path).exists());
        let restored = LedgerState::load_snapshot(&path).unwrap().unwrap();
        assert_eq!(restored.token().balance_of(&account), 21);
        assert!(ledger.inspect(|s| *s == restored).await);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_concurrent_mints_are_serialized() {
        let clock = Arc::new(ManualClock::new(0));
        let ledger = SharedLedger::new(LedgerState::default(), clock);
        let account = AccountId::from_bytes([2u8; 20]);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .apply(Operation::Mint {
                        account,
                        amount: 10,
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let (supply, balance) = ledger
            .inspect(|s| (s.token().total_supply(), s.token().balance_of(&account)))
            .await;
        assert_eq!(supply, 160);
        assert_eq!(balance, 160);
        assert!(ledger.inspect(|s| s.check_conservation()).await.is_ok());
    }
}
