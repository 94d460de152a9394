//! Bridge webhook.
//!
//! The bridge posts every session event as JSON to `/gateway/events`.
//! Events are forwarded into the runtime's event channel; an optional
//! shared secret in `X-Bridge-Secret` guards the endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::gateway::GatewayEvent;

/// Header carrying the shared secret.
pub const SECRET_HEADER: &str = "x-bridge-secret";

#[derive(Clone)]
struct WebhookState {
    events: mpsc::Sender<GatewayEvent>,
    secret: Option<Arc<str>>,
}

/// Build the webhook router.
pub fn router(events: mpsc::Sender<GatewayEvent>, secret: Option<String>) -> Router {
    let state = WebhookState {
        events,
        secret: secret.map(Arc::from),
    };

    Router::new()
        .route("/gateway/events", post(receive_event))
        .with_state(state)
}

async fn receive_event(
    State(hook): State<WebhookState>,
    headers: HeaderMap,
    Json(event): Json<GatewayEvent>,
) -> StatusCode {
    if let Some(secret) = &hook.secret {
        let presented = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if presented != Some(&**secret) {
            warn!("Rejected gateway event with bad secret");
            return StatusCode::UNAUTHORIZED;
        }
    }

    debug!("Gateway event: {:?}", event);

    match hook.events.send(event).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
