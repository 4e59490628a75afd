//! Effects produced by state transitions

/// Effects to be executed by the manager after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Save the full snapshot, including the new state
    PersistState,

    /// Replace the reply text with every session's facts
    SummarizeAllSessions,
}
