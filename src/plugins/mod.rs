//! Command plugins.
//!
//! Add new built-in commands by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding a [`Route`] variant and matching it in `resolve()`
//!
//! Canned `messages` always win over built-ins, and built-ins win over
//! plain `commands`.

pub mod custom;
pub mod leveling;
pub mod tagall;

use crate::bot::dispatcher::AppState;
use crate::database::{CannedMessage, Settings};
use crate::gateway::InboundMessage;
use crate::utils::split_command;

/// Where a chat command should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Text or image reply from `messages`.
    Canned(CannedMessage),
    /// `leveling <level> [bonus]` lookup.
    Leveling(Vec<String>),
    /// Mention every group member.
    TagAll(Vec<String>),
    /// Text reply from `commands`.
    Reply(String),
}

/// Resolve raw chat text against the settings.
///
/// Returns `None` when no prefix matches or the command is unknown.
pub fn resolve(text: &str, settings: &Settings) -> Option<Route> {
    let prefix = settings.match_prefix(text)?;
    let command = text[prefix.len()..].trim();

    if let Some(canned) = settings.messages.get(command) {
        return Some(Route::Canned(canned.clone()));
    }

    if command.starts_with("leveling") {
        return Some(Route::Leveling(arguments(command)));
    }

    if command.starts_with("tagall") {
        return Some(Route::TagAll(arguments(command)));
    }

    settings
        .commands
        .get(command)
        .map(|reply| Route::Reply(reply.clone()))
}

/// Words after the command name.
fn arguments(command: &str) -> Vec<String> {
    let (_, args) = split_command(command);
    args.into_iter().map(str::to_string).collect()
}

/// Reply to a message in its chat, quoting it.
pub async fn reply(state: &AppState, msg: &InboundMessage, text: &str) -> anyhow::Result<()> {
    state
        .gateway
        .send_text(&msg.chat_id, text, Some(&msg.id), &[])
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.prefixes = vec!["!".to_string(), ".".to_string()];
        settings.set_command("menu", "Menu list");
        settings.set_command("tagall", "shadowed");
        settings.set_image_command("logo", "http://localhost:3000/logo.png", Some("Our logo"));
        settings
    }

    #[test]
    fn test_no_prefix_is_ignored() {
        assert_eq!(resolve("menu", &settings()), None);
        assert_eq!(resolve("", &settings()), None);
    }

    #[test]
    fn test_every_prefix_reaches_commands() {
        let settings = settings();
        for prefix in &settings.prefixes {
            assert_eq!(
                resolve(&format!("{}menu", prefix), &settings),
                Some(Route::Reply("Menu list".to_string()))
            );
        }
    }

    #[test]
    fn test_command_is_trimmed() {
        assert_eq!(
            resolve("!  menu  ", &settings()),
            Some(Route::Reply("Menu list".to_string()))
        );
    }

    #[test]
    fn test_canned_messages_win() {
        let mut settings = settings();
        settings.set_image_command("menu", "http://localhost:3000/menu.png", None);

        assert!(matches!(resolve("!menu", &settings), Some(Route::Canned(_))));
        assert!(matches!(resolve("!logo", &settings), Some(Route::Canned(_))));
    }

    #[test]
    fn test_builtins_shadow_plain_commands() {
        assert_eq!(
            resolve("!tagall hello  world", &settings()),
            Some(Route::TagAll(vec!["hello".to_string(), "world".to_string()]))
        );
        assert_eq!(
            resolve(".leveling 50 10", &settings()),
            Some(Route::Leveling(vec!["50".to_string(), "10".to_string()]))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(resolve("!unknown", &settings()), None);
    }
}
