//! Process configuration read from the environment

use std::path::PathBuf;
use thiserror::Error;

/// Default location of the state file, relative to the working directory
pub const DEFAULT_STATE_FILE: &str = "data/state.json";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TELEGRAM_TOKEN env variable is required")]
    MissingToken,
}

/// Bot configuration
///
/// Deliberately not `Debug`: it holds the bot token.
#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub state_file: PathBuf,
    /// Log raw updates and every API call
    pub debug: bool,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = non_blank("TELEGRAM_TOKEN").ok_or(ConfigError::MissingToken)?;
        let state_file = non_blank("STATE_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_FILE), PathBuf::from);
        let debug = lookup("BOT_DEBUG").as_deref() == Some("1");

        Ok(Self {
            token: token.trim().to_string(),
            state_file,
            debug,
        })
    }

    /// Tracing filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "doctor_botter=debug"
        } else {
            "doctor_botter=info"
        }
    }
}
