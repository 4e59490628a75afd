//! Pure state transition function
//!
//! Commands are handled the same way in every stage. Free text is
//! interpreted according to the session's current stage.

use super::state::{fixed_category, DONE, SOMETHING_ELSE};
use super::{Command, Effect, Event, Reply, SessionState, Snapshot, Stage};

const GREETING: &str = "Hi! My name is Doctor Botter.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub reply: Reply,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState, reply: Reply) -> Self {
        Self {
            new_state: state,
            reply,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Whether the manager must save a snapshot after this transition
    #[allow(dead_code)] // Used in tests
    pub fn persists(&self) -> bool {
        self.effects.contains(&Effect::PersistState)
    }
}

/// Pure transition function
///
/// Given the same state and event it always produces the same result;
/// persistence and cross-session rendering are left to the caller as effects.
pub fn transition(state: &SessionState, event: Event) -> TransitionResult {
    match event {
        Event::Command(command) => handle_command(state, &command),
        Event::Text(text) => match state.stage {
            Stage::Choosing => handle_choosing(state, text.trim()),
            Stage::TypingChoice => handle_typing_choice(state, text.trim()),
            Stage::TypingReply => handle_typing_reply(state, text.trim()),
        },
    }
}

fn handle_command(state: &SessionState, command: &Command) -> TransitionResult {
    match command {
        Command::Start => start(state),
        Command::Cancel => finish(state),
        Command::ShowData => TransitionResult::new(
            state.clone(),
            Reply::with_keyboard(format!("Stored facts:{}", state.facts_block())),
        ),
        // Text is filled in by the manager, which can see every session
        Command::ShowAllData => TransitionResult::new(state.clone(), Reply::text(String::new()))
            .with_effect(Effect::SummarizeAllSessions),
        Command::Unknown(_) => TransitionResult::new(
            state.clone(),
            Reply::text("Unknown command. Try /start to begin."),
        ),
    }
}

// ============================================================
// Stage Handlers
// ============================================================

fn handle_choosing(state: &SessionState, choice: &str) -> TransitionResult {
    if choice == SOMETHING_ELSE {
        let next = SessionState {
            stage: Stage::TypingChoice,
            ..state.clone()
        };
        return TransitionResult::new(next, Reply::removing_keyboard("Tell me the category name."))
            .with_effect(Effect::PersistState);
    }

    if choice == DONE {
        return finish(state);
    }

    if let Some(category) = fixed_category(choice) {
        let next = SessionState {
            stage: Stage::TypingReply,
            pending_key: category.to_string(),
            ..state.clone()
        };
        return TransitionResult::new(
            next,
            Reply::removing_keyboard(format!("Your {category}? Please type it.")),
        )
        .with_effect(Effect::PersistState);
    }

    TransitionResult::new(
        state.clone(),
        Reply::with_keyboard("Please choose one of the options on the keyboard."),
    )
}

fn handle_typing_choice(state: &SessionState, label: &str) -> TransitionResult {
    if label.is_empty() {
        return TransitionResult::new(
            state.clone(),
            Reply::text("Category cannot be empty. Please send a label for your data."),
        );
    }

    let next = SessionState {
        stage: Stage::TypingReply,
        pending_key: label.to_string(),
        ..state.clone()
    };
    TransitionResult::new(next, Reply::text(format!("Great, now tell me about {label}.")))
        .with_effect(Effect::PersistState)
}

fn handle_typing_reply(state: &SessionState, value: &str) -> TransitionResult {
    if state.pending_key.is_empty() {
        let next = SessionState {
            stage: Stage::Choosing,
            ..state.clone()
        };
        return TransitionResult::new(
            next,
            Reply::with_keyboard("I lost track of what we were talking about. Pick an option again."),
        )
        .with_effect(Effect::PersistState);
    }

    let mut next = state.clone();
    let label = std::mem::take(&mut next.pending_key);
    next.data.insert(label.clone(), value.to_string());
    next.stage = Stage::Choosing;

    TransitionResult::new(
        next,
        Reply::with_keyboard(format!("Saved {label}. What would you like to do next?")),
    )
    .with_effect(Effect::PersistState)
}

// ============================================================
// Conversation Start / Finish
// ============================================================

fn start(state: &SessionState) -> TransitionResult {
    let next = SessionState {
        stage: Stage::Choosing,
        pending_key: String::new(),
        data: state.data.clone(),
    };

    let text = if next.data.is_empty() {
        format!(
            "{GREETING} I will hold a more complex conversation with you. \
             Tell me something about yourself."
        )
    } else {
        format!(
            "{GREETING} You already told me your {}. Tell me more or update something.",
            next.known_labels()
        )
    };

    TransitionResult::new(next, Reply::with_keyboard(text)).with_effect(Effect::PersistState)
}

fn finish(state: &SessionState) -> TransitionResult {
    let summary = format!(
        "I learned these facts about you:{}Until next time!",
        state.facts_block()
    );
    let next = SessionState {
        stage: Stage::Choosing,
        pending_key: String::new(),
        data: state.data.clone(),
    };
    TransitionResult::new(next, Reply::removing_keyboard(summary)).with_effect(Effect::PersistState)
}

/// Render every session's facts, ordered by session id
pub fn summarize_sessions(sessions: &Snapshot) -> String {
    if sessions.is_empty() {
        return "All saved data:\n(nothing yet)\n".to_string();
    }
    let blocks: Vec<String> = sessions
        .iter()
        .map(|(id, state)| format!("User {id}:{}", state.facts_block()))
        .collect();
    format!("All saved data:\n{}", blocks.join("\n"))
}
