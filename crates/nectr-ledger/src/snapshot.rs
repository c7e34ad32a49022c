// crates/nectr-ledger/src/snapshot.rs
//
// JSON snapshots of the whole ledger state.
//
// A snapshot is written to `<path>.tmp` and renamed over `<path>`, so a
// crash mid-write leaves the previous snapshot intact. Loading re-checks the
// accounting identities before handing the state back.

use std::fs;
use std::path::{Path, PathBuf};

use nectr_core::NectrError;

use crate::state::LedgerState;

impl LedgerState {
    /// Load a snapshot from `path`.
    ///
    /// Returns `Ok(None)` if no snapshot exists yet.
    pub fn load_snapshot(path: &Path) -> Result<Option<Self>, NectrError> {
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path)?;
        let state: LedgerState = serde_json::from_slice(&bytes)?;
        state.check_conservation().map_err(|e| {
            NectrError::Storage(format!(
                "snapshot {} is inconsistent: {}",
                path.display(),
                e
            ))
        })?;
        tracing::info!(
            path = %path.display(),
            accounts = state.positions.accounts().count(),
            "Loaded ledger snapshot"
        );
        Ok(Some(state))
    }

    /// Write the state to `path`, replacing any previous snapshot.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), NectrError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let bytes = self.snapshot_bytes()?;
        let tmp = snapshot_tmp_path(path);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        tracing::debug!(path = %path.display(), "Saved ledger snapshot");
        Ok(())
    }

    /// Serialized snapshot contents, for callers that do their own I/O.
    pub fn snapshot_bytes(&self) -> Result<Vec<u8>, NectrError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

/// The scratch file a snapshot at `path` is written to before the rename.
pub fn snapshot_tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
