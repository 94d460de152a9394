//! Wabot - WhatsApp group bot with a web console.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - JSON settings store
//! - `gateway` - WhatsApp session bridge (trait + HTTP implementation)
//! - `permissions` - Bot admin checks
//! - `bot` - Event loop, dispatcher and bridge webhook
//! - `plugins` - Chat commands (canned replies, leveling, tagall)
//! - `events` - Join/leave notices
//! - `admin` - Web console
//! - `utils` - Utility functions

mod admin;
mod bot;
mod config;
mod database;
mod events;
mod gateway;
mod i18n;
mod permissions;
mod plugins;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use admin::AdminState;
use bot::{AppState, ConnectionStatus};
use config::Config;
use database::SettingsStore;
use gateway::{BridgeGateway, Gateway};
use plugins::leveling::LevelingClient;

/// Buffered gateway events before the webhook applies backpressure.
const EVENT_BUFFER: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wabot=info,tower_http=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting wabot...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");

    let settings = SettingsStore::load(&config.settings_path)
        .with_context(|| format!("loading {}", config.settings_path.display()))?;
    let settings = Arc::new(settings);
    info!(
        "Settings loaded from {}: {} prefixes, {} commands, {} canned messages",
        settings.path().display(),
        settings.get().prefixes.len(),
        settings.get().commands.len(),
        settings.get().messages.len()
    );

    let gateway: Arc<dyn Gateway> = Arc::new(BridgeGateway::new(
        &config.bridge_url,
        config.bridge_token.clone(),
    )?);
    info!("Bridge gateway: {}", config.bridge_url);

    let leveling = Arc::new(LevelingClient::new(&config.leveling_url, config.leveling_gap)?);
    let connection = Arc::new(ConnectionStatus::new());

    let state = AppState::new(
        gateway,
        settings.clone(),
        leveling,
        connection.clone(),
        &config,
    );

    let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);

    let console = admin::router(AdminState {
        settings,
        connection,
        upload_dir: Arc::new(config.upload_dir.clone()),
        public_url: Arc::from(config.public_url.as_str()),
        max_upload_bytes: config.max_upload_bytes,
    });
    let app = console
        .merge(bot::webhook::router(events_tx, config.bridge_secret.clone()))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Console listening on http://{}", listener.local_addr()?);
    if config.bridge_secret.is_none() {
        info!("BRIDGE_SECRET not set; webhook accepts unauthenticated events");
    }

    let server = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    };

    tokio::select! {
        result = server => result?,
        _ = bot::run(state, events_rx) => {}
    }

    info!("Wabot stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
