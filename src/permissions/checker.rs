//! Admin checker backed by live group metadata.

use std::sync::Arc;

use tracing::debug;

use crate::gateway::{AdminRole, Gateway, GroupMetadata};
use crate::utils::normalize_jid;

/// Permission checker for the bot's own identity.
#[derive(Clone)]
pub struct Permissions {
    gateway: Arc<dyn Gateway>,
}

impl Permissions {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Check if the bot is currently an admin of the group.
    ///
    /// A bot missing from the participant list is not an admin.
    pub async fn is_self_admin(&self, group_jid: &str) -> anyhow::Result<bool> {
        let metadata = self.gateway.group_metadata(group_jid).await?;
        let me = normalize_jid(&self.gateway.self_id().await?);

        let role = admin_role(&metadata, &me);
        debug!("Bot {} role in {}: {:?}", me, group_jid, role);

        Ok(role.is_some())
    }
}

/// Admin role of `jid` in the group, if it is a participant with one.
pub fn admin_role(metadata: &GroupMetadata, jid: &str) -> Option<AdminRole> {
    metadata
        .participants
        .iter()
        .find(|p| p.id == jid)
        .and_then(|p| p.admin)
}
