//! Conversation state types

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Telegram chat id
pub type SessionId = i64;

/// Every known session's state, ordered by ascending session id
pub type Snapshot = BTreeMap<SessionId, SessionState>;

// ============================================================================
// Keyboard Options
// ============================================================================

/// Option that lets the user name their own category
pub const SOMETHING_ELSE: &str = "Something else...";

/// Option that ends the conversation
pub const DONE: &str = "Done";

/// Categories offered on the keyboard
pub const FIXED_CATEGORIES: [&str; 3] = ["Age", "Favourite colour", "Number of siblings"];

/// Everything shown on the choice keyboard, in display order
pub const KEYBOARD_OPTIONS: [&str; 5] = [
    FIXED_CATEGORIES[0],
    FIXED_CATEGORIES[1],
    FIXED_CATEGORIES[2],
    SOMETHING_ELSE,
    DONE,
];

/// Look up a fixed category by its exact label
pub fn fixed_category(label: &str) -> Option<&'static str> {
    FIXED_CATEGORIES.iter().copied().find(|c| *c == label)
}

// ============================================================================
// Session State
// ============================================================================

/// Where a session is in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Waiting for the user to pick an option from the keyboard
    #[default]
    Choosing,
    /// Waiting for the value of `pending_key`
    TypingReply,
    /// Waiting for the name of a custom category
    TypingChoice,
}

/// Per-chat state, as persisted
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub stage: Stage,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: BTreeMap<String, String>,
    /// Only non-empty while `stage` is `TypingReply`
    #[serde(default)]
    pub pending_key: String,
}

impl SessionState {
    /// Check the pending-key invariant
    pub fn is_consistent(&self) -> bool {
        (self.stage == Stage::TypingReply) == !self.pending_key.is_empty()
    }

    /// Stored facts as `label - value` lines, sorted by label
    pub fn facts_block(&self) -> String {
        if self.data.is_empty() {
            return "\n(nothing yet)\n".to_string();
        }
        let lines: Vec<String> = self
            .data
            .iter()
            .map(|(label, value)| format!("{label} - {value}"))
            .collect();
        format!("\n{}\n", lines.join("\n"))
    }

    /// Known category labels joined for display
    pub fn known_labels(&self) -> String {
        self.data.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Replies
// ============================================================================

/// What the gateway should do with the choice keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Keyboard {
    Show,
    Remove,
    #[default]
    Unchanged,
}

/// Response handed back to the messaging gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, Keyboard::Unchanged)
    }

    pub fn with_keyboard(text: impl Into<String>) -> Self {
        Self::new(text, Keyboard::Show)
    }

    pub fn removing_keyboard(text: impl Into<String>) -> Self {
        Self::new(text, Keyboard::Remove)
    }

    #[allow(dead_code)] // Boolean view used by tests
    pub fn show_keyboard(&self) -> bool {
        self.keyboard == Keyboard::Show
    }

    #[allow(dead_code)] // Boolean view used by tests
    pub fn remove_keyboard(&self) -> bool {
        self.keyboard == Keyboard::Remove
    }
}
