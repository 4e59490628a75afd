//! File-backed session store
//!
//! The whole snapshot lives in one JSON file which is replaced atomically
//! on every save.

use crate::state_machine::{SessionId, SessionState, Snapshot};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("State file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Stateless handle to the state file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted snapshot
    ///
    /// A missing file is an empty snapshot. Keys that are not decimal
    /// session ids are dropped.
    pub fn load(&self) -> StoreResult<Snapshot> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Snapshot::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    action: "read",
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let encoded: BTreeMap<String, SessionState> =
            serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        let mut sessions = Snapshot::new();
        let mut dropped = 0usize;
        for (key, state) in encoded {
            match key.parse::<SessionId>() {
                Ok(id) => {
                    if !state.is_consistent() {
                        tracing::warn!(
                            session_id = id,
                            stage = ?state.stage,
                            "Loaded session has an inconsistent pending key"
                        );
                    }
                    sessions.insert(id, state);
                }
                Err(_) => {
                    dropped += 1;
                    tracing::warn!(key = %key, "Dropping session with undecodable id");
                }
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            sessions = sessions.len(),
            dropped,
            "Loaded state file"
        );
        Ok(sessions)
    }

    /// Replace the state file with the full snapshot
    pub fn save(&self, sessions: &Snapshot) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                action: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let payload = serde_json::to_string_pretty(sessions)?;

        let tmp = self.tmp_path();
        fs::write(&tmp, payload).map_err(|source| StoreError::Io {
            action: "write",
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            action: "rename into place",
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }

    /// Sibling of the target so the rename never crosses filesystems
    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
