//! Runtime for executing conversations
//!
//! Owns the session map and drives the pure state machine against a
//! snapshot store.

mod manager;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use manager::ConversationManager;
pub use traits::*;

use crate::store::FileStore;

/// Manager wired to the state file and tracing
pub type ProductionManager = ConversationManager<FileStore>;
