//! Welcome event handler.
//!
//! Greets a participant who joined the group.

use tracing::info;

use super::send_member_notice;
use crate::bot::dispatcher::AppState;

/// Send the welcome message for one participant.
pub async fn send_welcome(
    state: &AppState,
    group_id: &str,
    participant: &str,
    template: &str,
) -> anyhow::Result<()> {
    send_member_notice(state, group_id, participant, template).await?;
    info!("Sent welcome message to {} in {}", participant, group_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::bot::dispatcher::testing::state_with;
    use crate::database::Settings;
    use crate::gateway::mock::{MockGateway, Sent};

    #[tokio::test]
    async fn test_send_welcome_mentions_participant() {
        let gateway = Arc::new(MockGateway::new());
        let state = state_with(gateway.clone(), Settings::default());

        send_welcome(&state, "12036302@g.us", "62811@s.whatsapp.net", "Hai @user, welcome!")
            .await
            .unwrap();

        assert_eq!(
            gateway.sent(),
            vec![Sent::Text {
                jid: "12036302@g.us".to_string(),
                text: "Hai @62811, welcome!".to_string(),
                quoted: None,
                mentions: vec!["62811@s.whatsapp.net".to_string()],
            }]
        );
    }
}
