//! Event handler system.
//!
//! Group membership changes are answered with the welcome/leave templates
//! from the settings, one participant at a time.

pub mod bye;
pub mod welcome;

use tracing::{debug, error, info, warn};

use crate::bot::dispatcher::AppState;
use crate::database::USER_PLACEHOLDER;
use crate::gateway::{GroupParticipantsUpdate, ParticipantAction};
use crate::utils::mention_token;

/// Replace every `@user` placeholder with the participant's mention.
pub fn format_notice(template: &str, participant: &str) -> String {
    template.replace(USER_PLACEHOLDER, &mention_token(participant))
}

/// Send a templated notice to the group, mentioning `participant`.
async fn send_member_notice(
    state: &AppState,
    group_id: &str,
    participant: &str,
    template: &str,
) -> anyhow::Result<()> {
    let text = format_notice(template, participant);
    state
        .gateway
        .send_text(group_id, &text, None, &[participant.to_string()])
        .await?;
    Ok(())
}

/// Handle a membership change. Errors are logged, never returned.
pub async fn handle_participants_update(state: &AppState, update: GroupParticipantsUpdate) {
    if let Err(e) = process_update(state, &update).await {
        error!(
            "Error handling {:?} in group {}: {:#}",
            update.action, update.group_id, e
        );
    }
}

async fn process_update(state: &AppState, update: &GroupParticipantsUpdate) -> anyhow::Result<()> {
    info!(
        "Group participants update in {}: {:?} {:?}",
        update.group_id, update.action, update.participants
    );

    if !state.permissions.is_self_admin(&update.group_id).await? {
        warn!(
            "Bot is not admin in {}, skipping automatic messages",
            update.group_id
        );
        return Ok(());
    }

    let settings = state.settings.get();

    for (i, participant) in update.participants.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(state.member_event_delay).await;
        }

        match update.action {
            ParticipantAction::Add => {
                welcome::send_welcome(state, &update.group_id, participant, &settings.welcome_message)
                    .await?
            }
            ParticipantAction::Remove => {
                bye::send_bye(state, &update.group_id, participant, &settings.leave_message).await?
            }
            other => debug!("Ignoring {:?} for {}", other, participant),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::bot::dispatcher::testing::state_with;
    use crate::database::Settings;
    use crate::gateway::mock::{MockGateway, Sent};

    const GROUP: &str = "12036302@g.us";
    const BOT: &str = "62800@s.whatsapp.net";
    const ALICE: &str = "62811@s.whatsapp.net";
    const BOB: &str = "62822@s.whatsapp.net";

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.welcome_message = "Welcome @user!".to_string();
        settings.leave_message = "Bye @user.".to_string();
        settings
    }

    fn update(action: ParticipantAction, participants: &[&str]) -> GroupParticipantsUpdate {
        GroupParticipantsUpdate {
            group_id: GROUP.to_string(),
            participants: participants.iter().map(|p| p.to_string()).collect(),
            action,
        }
    }

    #[tokio::test]
    async fn test_join_sends_welcome_with_mention() {
        let gateway = Arc::new(MockGateway::new().with_group(GROUP, &[BOT, ALICE], &[BOT]));
        let state = state_with(gateway.clone(), settings());

        handle_participants_update(&state, update(ParticipantAction::Add, &[ALICE])).await;

        assert_eq!(
            gateway.sent(),
            vec![Sent::Text {
                jid: GROUP.to_string(),
                text: "Welcome @62811!".to_string(),
                quoted: None,
                mentions: vec![ALICE.to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn test_leave_uses_leave_template() {
        let gateway = Arc::new(MockGateway::new().with_group(GROUP, &[BOT], &[BOT]));
        let state = state_with(gateway.clone(), settings());

        handle_participants_update(&state, update(ParticipantAction::Remove, &[ALICE, BOB])).await;

        assert_eq!(gateway.texts(), vec!["Bye @62811.", "Bye @62822."]);
    }

    #[tokio::test]
    async fn test_not_admin_sends_nothing() {
        let gateway = Arc::new(MockGateway::new().with_group(GROUP, &[BOT, ALICE], &[]));
        let state = state_with(gateway.clone(), settings());

        handle_participants_update(&state, update(ParticipantAction::Add, &[ALICE])).await;

        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_action_is_ignored() {
        let gateway = Arc::new(MockGateway::new().with_group(GROUP, &[BOT, ALICE], &[BOT]));
        let state = state_with(gateway.clone(), settings());

        handle_participants_update(&state, update(ParticipantAction::Promote, &[ALICE])).await;
        handle_participants_update(&state, update(ParticipantAction::Unknown, &[ALICE])).await;

        assert!(gateway.sent().is_empty());
    }

    #[test]
    fn test_format_notice_replaces_every_placeholder() {
        assert_eq!(
            format_notice("Selamat datang, @user! Hai @user", ALICE),
            "Selamat datang, @62811! Hai @62811"
        );
        assert_eq!(format_notice("Hello", ALICE), "Hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_participants_are_spaced_out() {
        let gateway = Arc::new(MockGateway::new().with_group(GROUP, &[BOT], &[BOT]));
        let mut state = state_with(gateway.clone(), settings());
        state.member_event_delay = Duration::from_secs(1);

        let start = tokio::time::Instant::now();
        handle_participants_update(&state, update(ParticipantAction::Add, &[ALICE, BOB])).await;

        assert_eq!(gateway.sent().len(), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }
}
