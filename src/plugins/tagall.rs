//! Tag-all command.
//!
//! Sends a single message mentioning every member of the group.

use tracing::{info, warn};

use super::reply;
use crate::bot::dispatcher::AppState;
use crate::gateway::InboundMessage;
use crate::i18n::{get_text, get_text_with};
use crate::utils::mention_token;

/// Build the broadcast body: caption line, blank line, mention tokens.
pub fn format_tagall_text(locale: &str, args: &[String], members: &[String]) -> String {
    let message = if args.is_empty() {
        get_text(locale, "tagall.no_message")
    } else {
        args.join(" ")
    };

    let mentions = members
        .iter()
        .map(|id| mention_token(id))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{}\n\n{}",
        get_text_with(locale, "tagall.header", &[("message", &message)]),
        mentions
    )
}

/// Handle `tagall [message]`.
pub async fn tagall_command(
    state: &AppState,
    msg: &InboundMessage,
    args: &[String],
) -> anyhow::Result<()> {
    if !msg.is_group() {
        return reply(state, msg, &get_text(&state.locale, "tagall.group_only")).await;
    }

    let metadata = match state.gateway.group_metadata(&msg.chat_id).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Failed to fetch members of {}: {}", msg.chat_id, e);
            let text = get_text_with(&state.locale, "tagall.error", &[("error", &e.to_string())]);
            return reply(state, msg, &text).await;
        }
    };

    let members = metadata.member_ids();
    if members.is_empty() {
        return reply(state, msg, &get_text(&state.locale, "tagall.no_members")).await;
    }

    let text = format_tagall_text(&state.locale, args, &members);
    state
        .gateway
        .send_text(&msg.chat_id, &text, None, &members)
        .await?;

    info!(
        "Tagall sent to {} members in group {}",
        members.len(),
        metadata.subject
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_message() {
        let members = vec![
            "62811@s.whatsapp.net".to_string(),
            "62822@s.whatsapp.net".to_string(),
        ];
        let text = format_tagall_text("en", &["rapat".to_string(), "jam 8".to_string()], &members);

        assert_eq!(text, "📢 TAG ALL: rapat jam 8\n\n@62811 @62822");
    }

    #[test]
    fn test_format_default_message() {
        let members = vec!["62811@s.whatsapp.net".to_string()];
        let text = format_tagall_text("id", &[], &members);

        assert_eq!(text, "📢 TAG ALL: Tidak ada pesan tambahan.\n\n@62811");
    }
}
