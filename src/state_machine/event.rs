//! Events that can occur in a conversation

/// Slash commands understood by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    /// `/cancel` or `/stop`
    Cancel,
    ShowData,
    ShowAllData,
    Unknown(String),
}

impl Command {
    /// Parse a command name without the leading slash
    pub fn parse(name: &str) -> Self {
        match name {
            "start" => Command::Start,
            "cancel" | "stop" => Command::Cancel,
            "show_data" => Command::ShowData,
            "show_all_data" => Command::ShowAllData,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    /// Free text, untrimmed
    Text(String),
}

impl Event {
    /// Whether handling this event needs the session to exist
    ///
    /// Unknown commands and the cross-session listing never create state.
    pub fn creates_session(&self) -> bool {
        !matches!(
            self,
            Event::Command(Command::ShowAllData | Command::Unknown(_))
        )
    }
}
