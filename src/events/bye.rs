//! Goodbye event handler.
//!
//! Says goodbye to a participant who left or was removed.

use tracing::info;

use super::send_member_notice;
use crate::bot::dispatcher::AppState;

/// Send the goodbye message for one participant.
pub async fn send_bye(
    state: &AppState,
    group_id: &str,
    participant: &str,
    template: &str,
) -> anyhow::Result<()> {
    send_member_notice(state, group_id, participant, template).await?;
    info!("Sent goodbye message for {} in {}", participant, group_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::bot::dispatcher::testing::state_with;
    use crate::database::Settings;
    use crate::gateway::mock::MockGateway;

    #[tokio::test]
    async fn test_send_bye_fills_template() {
        let gateway = Arc::new(MockGateway::new());
        let state = state_with(gateway.clone(), Settings::default());

        send_bye(&state, "12036302@g.us", "62822@s.whatsapp.net", "Selamat tinggal, @user! 👋")
            .await
            .unwrap();

        assert_eq!(gateway.texts(), vec!["Selamat tinggal, @62822! 👋"]);
    }

    #[tokio::test]
    async fn test_send_bye_propagates_send_failure() {
        let mut gateway = MockGateway::new();
        gateway.fail_sends = true;
        let gateway = Arc::new(gateway);
        let state = state_with(gateway.clone(), Settings::default());

        let result = send_bye(&state, "12036302@g.us", "62822@s.whatsapp.net", "Bye @user").await;

        assert!(result.is_err());
        assert!(gateway.sent().is_empty());
    }
}
