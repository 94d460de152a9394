//! Replies configured from the console.

use tracing::debug;

use super::reply;
use crate::bot::dispatcher::AppState;
use crate::database::CannedMessage;
use crate::gateway::InboundMessage;

/// Send a canned text or image reply.
pub async fn canned_command(
    state: &AppState,
    msg: &InboundMessage,
    canned: &CannedMessage,
) -> anyhow::Result<()> {
    match canned {
        CannedMessage::Text { content } => reply(state, msg, content).await,
        CannedMessage::Image { image_url, caption } => {
            debug!("Sending image {} to {}", image_url, msg.chat_id);
            state
                .gateway
                .send_image(&msg.chat_id, image_url, caption.as_deref(), Some(&msg.id))
                .await?;
            Ok(())
        }
    }
}

/// Send a plain text command reply.
pub async fn text_command(state: &AppState, msg: &InboundMessage, text: &str) -> anyhow::Result<()> {
    reply(state, msg, text).await
}
