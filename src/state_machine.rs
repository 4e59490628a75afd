//! Core conversation state machine
//!
//! Pure transitions over a single session's state. The manager in
//! `runtime` owns the session map and executes the effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Command, Event};
pub use state::{Keyboard, Reply, SessionId, SessionState, Snapshot, Stage};
pub use transition::{summarize_sessions, transition, TransitionResult};
