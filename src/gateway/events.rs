//! Inbound gateway events.

use serde::{Deserialize, Serialize};

use crate::utils::is_group_jid;

/// Close status meaning the session was logged out; never reconnect on it.
pub const LOGGED_OUT_STATUS: u16 = 401;

/// Event pushed by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum GatewayEvent {
    Message(InboundMessage),
    GroupParticipants(GroupParticipantsUpdate),
    Connection(ConnectionUpdate),
}

/// Text message received in a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    /// Message id, used to quote replies.
    pub id: String,
    /// Chat the message was posted in (group or personal).
    pub chat_id: String,
    /// Author of the message.
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub text: String,
}

impl InboundMessage {
    pub fn is_group(&self) -> bool {
        is_group_jid(&self.chat_id)
    }
}

/// Membership action on a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantAction {
    Add,
    Remove,
    Promote,
    Demote,
    #[serde(other)]
    Unknown,
}

/// Participants joined/left/changed role in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupParticipantsUpdate {
    pub group_id: String,
    pub participants: Vec<String>,
    pub action: ParticipantAction,
}

/// Session connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connecting,
    Open,
    Close,
}

/// Connection state change, with the close status if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionUpdate {
    pub state: ConnectionState,
    #[serde(default)]
    pub status_code: Option<u16>,
}

impl ConnectionUpdate {
    /// Whether a closed session should be restarted.
    pub fn should_reconnect(&self) -> bool {
        self.state == ConnectionState::Close && self.status_code != Some(LOGGED_OUT_STATUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_message_event() {
        let raw = r#"{
            "event": "message",
            "id": "ABC",
            "chatId": "12036302@g.us",
            "senderId": "628123@s.whatsapp.net",
            "text": "!halo"
        }"#;
        let event: GatewayEvent = serde_json::from_str(raw).unwrap();

        match event {
            GatewayEvent::Message(msg) => {
                assert!(msg.is_group());
                assert_eq!(msg.text, "!halo");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_unknown_participant_action() {
        let raw = r#"{
            "event": "group-participants",
            "groupId": "1@g.us",
            "participants": ["628123@s.whatsapp.net"],
            "action": "modify"
        }"#;
        let event: GatewayEvent = serde_json::from_str(raw).unwrap();

        assert!(matches!(
            event,
            GatewayEvent::GroupParticipants(GroupParticipantsUpdate {
                action: ParticipantAction::Unknown,
                ..
            })
        ));
    }

    #[test]
    fn test_reconnect_policy() {
        let logged_out = ConnectionUpdate {
            state: ConnectionState::Close,
            status_code: Some(LOGGED_OUT_STATUS),
        };
        let dropped = ConnectionUpdate {
            state: ConnectionState::Close,
            status_code: Some(428),
        };
        let no_code = ConnectionUpdate {
            state: ConnectionState::Close,
            status_code: None,
        };
        let open = ConnectionUpdate {
            state: ConnectionState::Open,
            status_code: None,
        };

        assert!(!logged_out.should_reconnect());
        assert!(dropped.should_reconnect());
        assert!(no_code.should_reconnect());
        assert!(!open.should_reconnect());
    }
}
