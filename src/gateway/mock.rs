//! Recording gateway for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{AdminRole, Gateway, GatewayError, GroupMetadata, Participant};

/// Message captured by [`MockGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        jid: String,
        text: String,
        quoted: Option<String>,
        mentions: Vec<String>,
    },
    Image {
        jid: String,
        image_url: String,
        caption: Option<String>,
        quoted: Option<String>,
    },
}

/// In-memory gateway that records every outbound call.
pub struct MockGateway {
    pub self_id: String,
    pub groups: Mutex<HashMap<String, GroupMetadata>>,
    pub sent: Mutex<Vec<Sent>>,
    pub connects: Mutex<usize>,
    pub fail_sends: bool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            self_id: "62800:3@s.whatsapp.net".to_string(),
            groups: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            connects: Mutex::new(0),
            fail_sends: false,
        }
    }

    /// Register a group; `admins` must be a subset of `members`.
    pub fn with_group(self, jid: &str, members: &[&str], admins: &[&str]) -> Self {
        let participants = members
            .iter()
            .map(|id| Participant {
                id: id.to_string(),
                admin: admins.contains(id).then_some(AdminRole::Admin),
            })
            .collect();

        self.groups.lock().insert(
            jid.to_string(),
            GroupMetadata {
                id: jid.to_string(),
                subject: "Test Group".to_string(),
                participants,
            },
        );
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    /// Text bodies of every sent text message.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                Sent::Image { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn connect(&self) -> Result<(), GatewayError> {
        *self.connects.lock() += 1;
        Ok(())
    }

    async fn send_text(
        &self,
        jid: &str,
        text: &str,
        quoted: Option<&str>,
        mentions: &[String],
    ) -> Result<(), GatewayError> {
        if self.fail_sends {
            return Err(GatewayError::NotConnected);
        }
        self.sent.lock().push(Sent::Text {
            jid: jid.to_string(),
            text: text.to_string(),
            quoted: quoted.map(str::to_string),
            mentions: mentions.to_vec(),
        });
        Ok(())
    }

    async fn send_image(
        &self,
        jid: &str,
        image_url: &str,
        caption: Option<&str>,
        quoted: Option<&str>,
    ) -> Result<(), GatewayError> {
        if self.fail_sends {
            return Err(GatewayError::NotConnected);
        }
        self.sent.lock().push(Sent::Image {
            jid: jid.to_string(),
            image_url: image_url.to_string(),
            caption: caption.map(str::to_string),
            quoted: quoted.map(str::to_string),
        });
        Ok(())
    }

    async fn group_metadata(&self, jid: &str) -> Result<GroupMetadata, GatewayError> {
        self.groups
            .lock()
            .get(jid)
            .cloned()
            .ok_or_else(|| GatewayError::Status {
                status: 404,
                body: format!("unknown group {}", jid),
            })
    }

    async fn self_id(&self) -> Result<String, GatewayError> {
        Ok(self.self_id.clone())
    }
}
