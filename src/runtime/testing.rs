//! Mock implementations for testing
//!
//! These mocks enable manager tests without touching the filesystem.

use super::traits::*;
use crate::state_machine::{SessionId, Snapshot};
use crate::store::StoreError;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

// ============================================================================
// Mock Stores
// ============================================================================

/// In-memory store that records every saved snapshot
#[derive(Default)]
pub struct MemoryStore {
    initial: Snapshot,
    saved: Mutex<Vec<Snapshot>>,
}

impl MemoryStore {
    pub fn with_sessions(initial: Snapshot) -> Self {
        Self {
            initial,
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }

    pub fn last_saved(&self) -> Option<Snapshot> {
        self.saved.lock().unwrap().last().cloned()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Snapshot, StoreError> {
        Ok(self.initial.clone())
    }

    fn save(&self, sessions: &Snapshot) -> Result<(), StoreError> {
        self.saved.lock().unwrap().push(sessions.clone());
        Ok(())
    }
}

/// Store whose saves always fail
pub struct FailingStore;

impl SnapshotStore for FailingStore {
    fn load(&self) -> Result<Snapshot, StoreError> {
        Ok(Snapshot::new())
    }

    fn save(&self, _sessions: &Snapshot) -> Result<(), StoreError> {
        Err(StoreError::Io {
            action: "write",
            path: PathBuf::from("/unwritable/state.json.tmp"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only filesystem"),
        })
    }
}

// ============================================================================
// Mock Observer
// ============================================================================

/// Records the session of every persistence failure
#[derive(Default)]
pub struct RecordingObserver {
    failures: Mutex<Vec<SessionId>>,
}

impl RecordingObserver {
    pub fn failures(&self) -> Vec<SessionId> {
        self.failures.lock().unwrap().clone()
    }
}

impl PersistObserver for RecordingObserver {
    fn persist_failed(&self, session_id: SessionId, _error: &StoreError) {
        self.failures.lock().unwrap().push(session_id);
    }
}
