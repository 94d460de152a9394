//! Inbound message dispatch.
//!
//! Resolves each chat message to at most one command and runs it.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::runtime::ConnectionStatus;
use crate::config::Config;
use crate::database::SettingsStore;
use crate::gateway::{Gateway, InboundMessage};
use crate::i18n;
use crate::permissions::Permissions;
use crate::plugins::leveling::LevelingSource;
use crate::plugins::{self, custom, leveling, tagall, Route};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Session used for every outbound call.
    pub gateway: Arc<dyn Gateway>,

    /// Prefixes, commands and templates.
    pub settings: Arc<SettingsStore>,

    /// Admin checks for the bot itself.
    pub permissions: Permissions,

    /// Leveling table fetcher.
    pub leveling: Arc<dyn LevelingSource>,

    /// Last known session state, shown on the console.
    pub connection: Arc<ConnectionStatus>,

    /// Language of chat replies.
    pub locale: String,

    /// Pause between join/leave notices.
    pub member_event_delay: Duration,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        gateway: Arc<dyn Gateway>,
        settings: Arc<SettingsStore>,
        leveling: Arc<dyn LevelingSource>,
        connection: Arc<ConnectionStatus>,
        config: &Config,
    ) -> Self {
        let locale = if i18n::is_supported(&config.locale) {
            config.locale.clone()
        } else {
            warn!(
                "Unsupported BOT_LOCALE '{}', using '{}'",
                config.locale,
                i18n::FALLBACK_LOCALE
            );
            i18n::FALLBACK_LOCALE.to_string()
        };

        Self {
            permissions: Permissions::new(gateway.clone()),
            gateway,
            settings,
            leveling,
            connection,
            locale,
            member_event_delay: config.member_event_delay,
        }
    }
}

/// Handle one inbound chat message.
///
/// Sends at most one message. Failures are logged, never returned.
pub async fn handle_message(state: &AppState, msg: InboundMessage) {
    let settings = state.settings.get();

    let route = match plugins::resolve(&msg.text, &settings) {
        Some(route) => route,
        None => {
            debug!("No command in message {} from {}", msg.id, msg.chat_id);
            return;
        }
    };

    info!("Command from {} in {}: {}", msg.sender_id, msg.chat_id, msg.text.trim());

    let result = match &route {
        Route::Canned(canned) => custom::canned_command(state, &msg, canned).await,
        Route::Reply(text) => custom::text_command(state, &msg, text).await,
        Route::Leveling(args) => leveling::leveling_command(state, &msg, args).await,
        Route::TagAll(args) => tagall::tagall_command(state, &msg, args).await,
    };

    if let Err(e) = result {
        error!("Failed to answer {:?} in {}: {:#}", route, msg.chat_id, e);
    }
}
