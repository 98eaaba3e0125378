//! Persisted ledger state
//!
//! The whole state is one JSON document, rewritten after every mutation.
//! Writes go to a temp file in the same directory and are renamed over the
//! target, so an interrupted write never leaves a truncated state file.

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::RoutineInstance;
use crate::error::{LedgerError, LedgerResult};

/// The serialized ledger record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub routine_instances: Vec<RoutineInstance>,

    /// Earned points minus purchase debits, as of the last write
    #[serde(default)]
    pub total_points: i64,

    /// Aggregate of all purchase debits; absent in records written before debits were tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent_points: Option<u64>,
}

/// Single-writer JSON state file
pub struct StateStore {
    path: PathBuf,
    /// Held for the store's lifetime; the advisory lock is released on drop
    _lock: File,
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore").field("path", &self.path).finish()
    }
}

impl StateStore {
    /// Open the state file at `path`, taking an exclusive lock on its sidecar lock file
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref().to_path_buf();
        debug!(?path, "StateStore::open: called");

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let lock_path = sidecar(&path, "lock");
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        FileExt::try_lock_exclusive(&lock).map_err(|_| LedgerError::Locked(lock_path.display().to_string()))?;

        debug!(?path, "Opened state store");
        Ok(Self { path, _lock: lock })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted state
    ///
    /// Returns `Ok(None)` when the file is missing or blank, and
    /// `PersistenceCorrupt` when it exists but fails to parse.
    pub fn load(&self) -> LedgerResult<Option<PersistedState>> {
        debug!(path = ?self.path, "StateStore::load: called");
        if !self.path.exists() {
            debug!("StateStore::load: no state file");
            return Ok(None);
        }

        let bytes = fs::read(&self.path)?;
        let content = String::from_utf8(bytes).map_err(|e| LedgerError::PersistenceCorrupt(e.to_string()))?;
        if content.trim().is_empty() {
            debug!("StateStore::load: state file is empty");
            return Ok(None);
        }

        let state: PersistedState =
            serde_json::from_str(&content).map_err(|e| LedgerError::PersistenceCorrupt(e.to_string()))?;
        debug!(instances = state.routine_instances.len(), "StateStore::load: parsed state");
        Ok(Some(state))
    }

    /// Move an unreadable state file aside so the next save starts clean
    ///
    /// Returns the path the bad file was moved to.
    pub fn quarantine(&self) -> LedgerResult<PathBuf> {
        let target = sidecar(&self.path, "corrupt");
        fs::rename(&self.path, &target)?;
        warn!(from = ?self.path, to = ?target, "Moved corrupt state file aside");
        Ok(target)
    }

    /// Write the full state atomically
    pub fn save(&self, state: &PersistedState) -> LedgerResult<()> {
        debug!(
            path = ?self.path,
            instances = state.routine_instances.len(),
            total_points = state.total_points,
            "StateStore::save: called"
        );
        let json = serde_json::to_string_pretty(state)?;

        let tmp_path = sidecar(&self.path, "tmp");
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(json.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)?;
        info!(total_points = state.total_points, "Saved ledger state");
        Ok(())
    }
}

/// `state.json` -> `.state.json.<suffix>` in the same directory
fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "state".to_string());
    path.with_file_name(format!(".{}.{}", name, suffix))
}
