//! Conversation manager
//!
//! Single owner of every session's state. Each inbound event is handled
//! under one lock: lookup-or-create, pure transition, effects (including
//! the snapshot save), then the reply is returned.

use super::traits::{PersistObserver, SnapshotStore, TracingObserver};
use crate::state_machine::{
    summarize_sessions, transition, Command, Effect, Event, Reply, SessionId, SessionState,
    Snapshot, TransitionResult,
};
use crate::store::StoreError;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct ConversationManager<S, O = TracingObserver> {
    sessions: Mutex<Snapshot>,
    store: S,
    observer: O,
}

impl<S: SnapshotStore> ConversationManager<S> {
    /// Load every persisted session and log persistence failures
    pub fn open(store: S) -> Result<Self, StoreError> {
        Self::with_observer(store, TracingObserver)
    }
}

impl<S: SnapshotStore, O: PersistObserver> ConversationManager<S, O> {
    pub fn with_observer(store: S, observer: O) -> Result<Self, StoreError> {
        let sessions = store.load()?;
        tracing::info!(sessions = sessions.len(), "Conversation state loaded");
        Ok(Self {
            sessions: Mutex::new(sessions),
            store,
            observer,
        })
    }

    /// Handle a slash command (name without the slash), whatever the stage
    pub fn handle_command(&self, session_id: SessionId, name: &str) -> Reply {
        let command = Command::parse(name);
        if let Command::Unknown(name) = &command {
            tracing::debug!(session_id, command = %name, "Unknown command");
        }
        self.dispatch(session_id, Event::Command(command))
    }

    /// Handle free text according to the session's stage
    pub fn handle_message(&self, session_id: SessionId, text: &str) -> Reply {
        self.dispatch(session_id, Event::Text(text.to_string()))
    }

    /// Every session's facts, ordered by session id
    #[allow(dead_code)] // API completeness
    pub fn all_sessions_summary(&self) -> String {
        summarize_sessions(&self.lock())
    }

    /// Copy of one session's state
    #[allow(dead_code)] // API completeness
    pub fn session(&self, session_id: SessionId) -> Option<SessionState> {
        self.lock().get(&session_id).cloned()
    }

    fn dispatch(&self, session_id: SessionId, event: Event) -> Reply {
        let mut sessions = self.lock();

        let creates_session = event.creates_session();
        let current = if creates_session {
            sessions.entry(session_id).or_default().clone()
        } else {
            sessions.get(&session_id).cloned().unwrap_or_default()
        };

        tracing::debug!(session_id, stage = ?current.stage, event = ?event, "Handling event");

        let TransitionResult {
            new_state,
            mut reply,
            effects,
        } = transition(&current, event);

        if creates_session {
            if new_state.stage != current.stage {
                tracing::debug!(
                    session_id,
                    from = ?current.stage,
                    to = ?new_state.stage,
                    "Stage changed"
                );
            }
            sessions.insert(session_id, new_state);
        }

        for effect in effects {
            match effect {
                Effect::PersistState => {
                    if let Err(e) = self.store.save(&sessions) {
                        self.observer.persist_failed(session_id, &e);
                    }
                }
                Effect::SummarizeAllSessions => {
                    reply.text = summarize_sessions(&sessions);
                }
            }
        }

        reply
    }

    /// The map stays authoritative even if a holder panicked
    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
