//! Telegram gateway
//!
//! Long-polls the Bot API, feeds each message to the conversation manager
//! and renders the reply with the choice keyboard.

mod types;

pub use types::*;

use crate::runtime::{ConversationManager, PersistObserver, SnapshotStore};
use crate::state_machine::{Reply, SessionId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const API_BASE: &str = "https://api.telegram.org";

/// Seconds Telegram holds a `getUpdates` request open
const POLL_TIMEOUT_SECS: u64 = 30;

const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);
const SEND_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Telegram request failed: {0}")]
    Http(reqwest::Error),
    #[error("Telegram {method} returned an error: {description}")]
    Api {
        method: &'static str,
        description: String,
    },
}

/// The request URL carries the bot token, so it never reaches the message
impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Http(e.without_url())
    }
}

/// Inbound message reduced to what the manager understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Command name without the slash or `@botname` suffix
    Command(String),
    Text(String),
}

impl Inbound {
    pub fn parse(text: &str) -> Self {
        match text.strip_prefix('/') {
            Some(rest) => {
                let word = rest.split_whitespace().next().unwrap_or_default();
                let name = word.split('@').next().unwrap_or_default();
                Inbound::Command(name.to_string())
            }
            None => Inbound::Text(text.to_string()),
        }
    }
}

pub struct TelegramGateway<S, O> {
    bot_token: String,
    client: reqwest::Client,
    manager: Arc<ConversationManager<S, O>>,
}

impl<S, O> TelegramGateway<S, O>
where
    S: SnapshotStore + 'static,
    O: PersistObserver + 'static,
{
    pub fn new(
        bot_token: String,
        manager: Arc<ConversationManager<S, O>>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()?;
        Ok(Self {
            bot_token,
            client,
            manager,
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("{API_BASE}/bot{}/{method}", self.bot_token)
    }

    async fn call<B, T>(&self, method: &'static str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(method, "Calling Telegram API");
        let response: ApiResponse<T> = self
            .client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        tracing::debug!(method, ok = response.ok, "Telegram API responded");
        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(GatewayError::Api {
                method,
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }

    /// Verify the token and return the bot's username
    pub async fn authorize(&self) -> Result<String, GatewayError> {
        let me: BotUser = self.call("getMe", &serde_json::json!({})).await?;
        Ok(me.username.unwrap_or_default())
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, GatewayError> {
        let body = GetUpdates {
            offset,
            timeout: POLL_TIMEOUT_SECS,
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &body).await
    }

    pub async fn send(&self, chat_id: SessionId, reply: &Reply) -> Result<(), GatewayError> {
        let body = SendMessage::new(chat_id, reply);
        let _sent: serde_json::Value = self.call("sendMessage", &body).await?;
        Ok(())
    }

    /// Run the manager for one message on the blocking pool
    async fn dispatch(&self, chat_id: SessionId, inbound: Inbound) -> Option<Reply> {
        let manager = Arc::clone(&self.manager);
        let handled = tokio::task::spawn_blocking(move || match inbound {
            Inbound::Command(name) => manager.handle_command(chat_id, &name),
            Inbound::Text(text) => manager.handle_message(chat_id, &text),
        })
        .await;

        match handled {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::error!(chat_id, error = %e, "Conversation handler panicked");
                None
            }
        }
    }

    /// Poll for updates until the process is interrupted
    pub async fn run(&self) -> Result<(), GatewayError> {
        let username = self.authorize().await?;
        tracing::info!(username = %username, "Authorized on Telegram");

        let mut offset: i64 = 0;
        loop {
            let updates = tokio::select! {
                result = self.get_updates(offset) => result,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown requested, stopping poll loop");
                    return Ok(());
                }
            };

            let updates = match updates {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!(error = %e, "Telegram poll error");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = update.update_id + 1;
                tracing::debug!(update_id = update.update_id, update = ?update, "Received update");

                let Some(Message {
                    chat,
                    text: Some(text),
                }) = update.message
                else {
                    continue;
                };

                let Some(reply) = self.dispatch(chat.id, Inbound::parse(&text)).await else {
                    continue;
                };

                if let Err(e) = self.send(chat.id, &reply).await {
                    tracing::warn!(chat_id = chat.id, error = %e, "Failed to send message");
                    tokio::time::sleep(SEND_RETRY_DELAY).await;
                }
            }
        }
    }
}
