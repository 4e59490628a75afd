//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the manager with mock implementations.

use crate::state_machine::{SessionId, Snapshot};
use crate::store::{FileStore, StoreError};
use std::sync::Arc;

/// Storage for the full session snapshot
pub trait SnapshotStore: Send + Sync {
    /// Read every persisted session
    fn load(&self) -> Result<Snapshot, StoreError>;

    /// Replace the persisted sessions with `sessions`
    fn save(&self, sessions: &Snapshot) -> Result<(), StoreError>;
}

/// Receives persistence failures that do not reach the caller
pub trait PersistObserver: Send + Sync {
    fn persist_failed(&self, session_id: SessionId, error: &StoreError);
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

impl<T: SnapshotStore + ?Sized> SnapshotStore for Arc<T> {
    fn load(&self) -> Result<Snapshot, StoreError> {
        (**self).load()
    }

    fn save(&self, sessions: &Snapshot) -> Result<(), StoreError> {
        (**self).save(sessions)
    }
}

impl<T: PersistObserver + ?Sized> PersistObserver for Arc<T> {
    fn persist_failed(&self, session_id: SessionId, error: &StoreError) {
        (**self).persist_failed(session_id, error);
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Snapshot, StoreError> {
        FileStore::load(self)
    }

    fn save(&self, sessions: &Snapshot) -> Result<(), StoreError> {
        FileStore::save(self, sessions)
    }
}

/// Logs persistence failures
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PersistObserver for TracingObserver {
    fn persist_failed(&self, session_id: SessionId, error: &StoreError) {
        tracing::error!(session_id, error = %error, "Failed to persist state");
    }
}
