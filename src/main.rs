//! Doctor Botter - Telegram fact collector
//!
//! Walks each chat through picking a category and typing a value for it,
//! and keeps every chat's facts in a JSON state file across restarts.

mod config;
mod runtime;
mod state_machine;
mod store;
mod telegram;

use config::BotConfig;
use runtime::ProductionManager;
use std::sync::Arc;
use store::FileStore;
use telegram::TelegramGateway;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration
    let config = BotConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Load state; a corrupt file stops startup
    let store = FileStore::new(&config.state_file);
    tracing::info!(path = %store.path().display(), "Opening state file");
    let manager = Arc::new(ProductionManager::open(store)?);

    let gateway = TelegramGateway::new(config.token, manager)?;
    gateway.run().await?;

    Ok(())
}
