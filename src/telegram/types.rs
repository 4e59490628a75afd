//! Bot API request and response types
//!
//! Only the fields the gateway reads or writes are modelled.

use crate::state_machine::state::KEYBOARD_OPTIONS;
use crate::state_machine::{Keyboard, Reply, SessionId};
use serde::{Deserialize, Serialize};

/// Envelope around every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: SessionId,
}

/// Result of `getMe`
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    #[serde(default)]
    pub username: Option<String>,
}

/// Body of `getUpdates`
#[derive(Debug, Serialize)]
pub struct GetUpdates {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

/// Body of `sendMessage`
///
/// Sent without `parse_mode`: facts are user text and a stray `_` or `*`
/// would make Telegram reject the whole message.
#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: SessionId,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

impl<'a> SendMessage<'a> {
    pub fn new(chat_id: SessionId, reply: &'a Reply) -> Self {
        Self {
            chat_id,
            text: &reply.text,
            reply_markup: ReplyMarkup::for_hint(reply.keyboard),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Keyboard(ReplyKeyboardMarkup),
    Remove(ReplyKeyboardRemove),
}

impl ReplyMarkup {
    /// Markup for a reply's keyboard hint, `None` leaves the chat as it is
    pub fn for_hint(hint: Keyboard) -> Option<Self> {
        match hint {
            Keyboard::Show => Some(ReplyMarkup::Keyboard(ReplyKeyboardMarkup::main())),
            Keyboard::Remove => Some(ReplyMarkup::Remove(ReplyKeyboardRemove {
                remove_keyboard: true,
                selective: true,
            })),
            Keyboard::Unchanged => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
    pub one_time_keyboard: bool,
}

impl ReplyKeyboardMarkup {
    /// The choice keyboard: two options per row, `Done` on its own
    pub fn main() -> Self {
        let keyboard = KEYBOARD_OPTIONS
            .chunks(2)
            .map(|row| {
                row.iter()
                    .map(|option| KeyboardButton {
                        text: (*option).to_string(),
                    })
                    .collect()
            })
            .collect();
        Self {
            keyboard,
            resize_keyboard: true,
            one_time_keyboard: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyKeyboardRemove {
    pub remove_keyboard: bool,
    pub selective: bool,
}
