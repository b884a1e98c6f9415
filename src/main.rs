//! lectern - a lecture-notes archive bot
//!
//! A Telegram bot that files uploaded notes under named lessons and
//! serves them back through an inline-keyboard menu.

mod db;
mod runtime;
mod session;
mod state_machine;
mod telegram;
mod view;

use db::Database;
use runtime::Router;
use session::SessionStore;
use std::path::PathBuf;
use std::sync::Arc;
use telegram::TelegramClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let token = std::env::var("LECTERN_BOT_TOKEN")
        .map_err(|_| "LECTERN_BOT_TOKEN is not set; refusing to start")?;

    let db_path = std::env::var("LECTERN_DB_PATH").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        format!("{home}/.lectern/lectern.db")
    });

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database (creates the schema if absent)
    tracing::info!(path = %db_path, "Opening database");
    let db = Database::open(&db_path)?;

    let sessions = SessionStore::new();
    let client = Arc::new(TelegramClient::new(&token));
    let router = Arc::new(Router::new(db, sessions, client.clone()));

    tracing::info!("lectern is polling for updates");
    client.run_polling(router).await;

    Ok(())
}
