//! Bot settings document.
//!
//! Field names follow the `settings.json` layout edited by the console.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder replaced with a participant mention in join/leave templates.
pub const USER_PLACEHOLDER: &str = "@user";

/// Canned reply bound to an exact command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CannedMessage {
    Text {
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        image_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
}

/// Everything the bot reads when handling chat traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Command prefixes, checked in declared order.
    pub prefixes: Vec<String>,

    /// Plain text replies.
    #[serde(default)]
    pub commands: BTreeMap<String, String>,

    /// Text/image replies, checked before built-in commands.
    #[serde(default)]
    pub messages: BTreeMap<String, CannedMessage>,

    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    #[serde(default = "default_leave_message")]
    pub leave_message: String,
}

fn default_welcome_message() -> String {
    "Selamat datang, @user! Semoga betah di grup 😊".to_string()
}

fn default_leave_message() -> String {
    "Selamat tinggal, @user! 👋".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("halo".to_string(), "Halo juga! 👋".to_string());

        Self {
            prefixes: vec!["!".to_string()],
            commands,
            messages: BTreeMap::new(),
            welcome_message: default_welcome_message(),
            leave_message: default_leave_message(),
        }
    }
}

impl Settings {
    /// First prefix (declared order) that starts the text.
    pub fn match_prefix(&self, text: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| text.starts_with(prefix))
    }

    /// Append a prefix. Returns false if it already exists.
    pub fn add_prefix(&mut self, prefix: &str) -> bool {
        if self.prefixes.iter().any(|p| p == prefix) {
            return false;
        }
        self.prefixes.push(prefix.to_string());
        true
    }

    /// Remove a prefix. Returns false if it was not configured.
    pub fn remove_prefix(&mut self, prefix: &str) -> bool {
        let before = self.prefixes.len();
        self.prefixes.retain(|p| p != prefix);
        self.prefixes.len() != before
    }

    /// Replace a prefix in place, keeping its position.
    ///
    /// Refused when `old` is missing or `new` is already another prefix.
    pub fn edit_prefix(&mut self, old: &str, new: &str) -> bool {
        if old != new && self.prefixes.iter().any(|p| p == new) {
            return false;
        }
        match self.prefixes.iter_mut().find(|p| p.as_str() == old) {
            Some(slot) => {
                *slot = new.to_string();
                true
            }
            None => false,
        }
    }

    /// Insert or overwrite a text command.
    pub fn set_command(&mut self, command: &str, response: &str) {
        self.commands.insert(command.to_string(), response.to_string());
    }

    /// Remove a text command. Returns false if it did not exist.
    pub fn remove_command(&mut self, command: &str) -> bool {
        self.commands.remove(command).is_some()
    }

    /// Rename a text command and replace its response.
    pub fn edit_command(&mut self, old: &str, new: &str, response: &str) -> bool {
        if self.commands.remove(old).is_none() {
            return false;
        }
        self.set_command(new, response);
        true
    }

    /// Bind an image reply to a command.
    pub fn set_image_command(&mut self, command: &str, image_url: &str, caption: Option<&str>) {
        self.messages.insert(
            command.to_string(),
            CannedMessage::Image {
                image_url: image_url.to_string(),
                caption: caption.map(str::to_string),
            },
        );
    }

    /// Remove a canned reply. Returns the removed entry.
    pub fn remove_message(&mut self, command: &str) -> Option<CannedMessage> {
        self.messages.remove(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_prefix_uses_declared_order() {
        let mut settings = Settings::default();
        settings.prefixes = vec![".".to_string(), ".!".to_string()];

        assert_eq!(settings.match_prefix(".!menu"), Some("."));
        assert_eq!(settings.match_prefix("menu"), None);
    }

    #[test]
    fn test_add_then_remove_prefix_restores_set() {
        let mut settings = Settings::default();
        let before = settings.prefixes.clone();

        assert!(settings.add_prefix("#"));
        assert!(!settings.add_prefix("#"));
        assert!(settings.remove_prefix("#"));

        assert_eq!(settings.prefixes, before);
    }

    #[test]
    fn test_edit_prefix_keeps_position() {
        let mut settings = Settings::default();
        settings.add_prefix("#");

        assert!(settings.edit_prefix("!", "/"));
        assert_eq!(settings.prefixes, vec!["/", "#"]);
        assert!(!settings.edit_prefix("missing", "?"));
        assert!(!settings.edit_prefix("/", "#"));
    }

    #[test]
    fn test_edit_command() {
        let mut settings = Settings::default();
        assert!(settings.edit_command("halo", "hai", "Hai!"));
        assert_eq!(settings.commands.get("hai").map(String::as_str), Some("Hai!"));
        assert!(!settings.commands.contains_key("halo"));
        assert!(!settings.edit_command("halo", "x", "y"));
    }

    #[test]
    fn test_legacy_document_without_optional_fields() {
        let raw = r#"{
            "prefixes": ["!"],
            "commands": { "tagall": "Tag all!" },
            "welcomeMessage": "Hi @user"
        }"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();

        assert!(settings.messages.is_empty());
        assert_eq!(settings.welcome_message, "Hi @user");
        assert!(settings.leave_message.contains(USER_PLACEHOLDER));
    }

    #[test]
    fn test_canned_message_json_layout() {
        let raw = r#"{
            "prefixes": ["!"],
            "messages": {
                "logo": { "type": "image", "imageUrl": "http://localhost:3000/a.png", "caption": "Logo" },
                "rules": { "type": "text", "content": "Be nice" }
            }
        }"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();

        assert_eq!(
            settings.messages.get("logo"),
            Some(&CannedMessage::Image {
                image_url: "http://localhost:3000/a.png".to_string(),
                caption: Some("Logo".to_string()),
            })
        );
        assert_eq!(
            settings.messages.get("rules"),
            Some(&CannedMessage::Text { content: "Be nice".to_string() })
        );

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["messages"]["logo"]["imageUrl"], "http://localhost:3000/a.png");
    }
}
