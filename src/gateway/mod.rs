//! Messaging gateway.
//!
//! The WhatsApp Web session lives outside this process. Everything the bot
//! needs from it goes through the [`Gateway`] trait:
//!
//! - `connect` - (re)start the session
//! - `send_text` / `send_image` - outbound messages
//! - `group_metadata` - participant list with admin roles
//! - `self_id` - the bot's own JID
//!
//! Inbound traffic arrives as [`GatewayEvent`]s on a channel.

mod bridge;
mod events;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bridge::BridgeGateway;
pub use events::{
    ConnectionState, ConnectionUpdate, GatewayEvent, GroupParticipantsUpdate, InboundMessage,
    ParticipantAction, LOGGED_OUT_STATUS,
};

/// Gateway call failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid bridge URL: {0}")]
    InvalidUrl(String),

    #[error("bridge request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bridge returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("session is not connected")]
    NotConnected,
}

/// Participant role in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Admin,
    Superadmin,
}

/// Group participant as reported by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    #[serde(default)]
    pub admin: Option<AdminRole>,
}

/// Snapshot of a group's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMetadata {
    pub id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl GroupMetadata {
    /// JIDs of every participant.
    pub fn member_ids(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }
}

/// Operations the bot performs against the chat network.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Start (or restart) the session.
    async fn connect(&self) -> Result<(), GatewayError>;

    /// Send a text message. `mentions` lists JIDs tagged in the text.
    async fn send_text(
        &self,
        jid: &str,
        text: &str,
        quoted: Option<&str>,
        mentions: &[String],
    ) -> Result<(), GatewayError>;

    /// Send an image fetched by the session from `image_url`.
    async fn send_image(
        &self,
        jid: &str,
        image_url: &str,
        caption: Option<&str>,
        quoted: Option<&str>,
    ) -> Result<(), GatewayError>;

    /// Fetch fresh metadata for a group.
    async fn group_metadata(&self, jid: &str) -> Result<GroupMetadata, GatewayError>;

    /// The bot's own JID, possibly with a device suffix.
    async fn self_id(&self) -> Result<String, GatewayError>;
}
