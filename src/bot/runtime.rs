//! Bot runtime - event loop and session supervision.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::dispatcher::{self, AppState};
use crate::events;
use crate::gateway::{ConnectionState, ConnectionUpdate, Gateway, GatewayEvent};

/// First reconnect delay; doubles per consecutive failure.
const RECONNECT_BASE: Duration = Duration::from_secs(1);

/// Upper bound for the reconnect delay.
const RECONNECT_MAX: Duration = Duration::from_secs(60);

/// Last connection state reported by the session.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSnapshot {
    pub state: ConnectionState,
    pub status_code: Option<u16>,
    pub since: DateTime<Utc>,
}

/// Shared connection state, read by the console.
pub struct ConnectionStatus {
    inner: RwLock<ConnectionSnapshot>,
}

impl ConnectionStatus {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ConnectionSnapshot {
                state: ConnectionState::Connecting,
                status_code: None,
                since: Utc::now(),
            }),
        }
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        *self.inner.read()
    }

    fn update(&self, update: &ConnectionUpdate) {
        *self.inner.write() = ConnectionSnapshot {
            state: update.state,
            status_code: update.status_code,
            since: Utc::now(),
        };
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Delay before reconnect attempt `attempt` (1-based).
pub fn reconnect_delay(attempt: u32) -> Duration {
    let factor = 1u32 << attempt.saturating_sub(1).min(16);
    RECONNECT_BASE.saturating_mul(factor).min(RECONNECT_MAX)
}

/// Keeps at most one reconnect task alive.
struct Supervisor {
    attempts: u32,
    task: Option<JoinHandle<()>>,
}

impl Supervisor {
    fn new() -> Self {
        Self {
            attempts: 0,
            task: None,
        }
    }

    /// Schedule a (re)connect unless one is already pending.
    fn schedule(&mut self, gateway: Arc<dyn Gateway>, delay: Duration) {
        if self.task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }
        self.task = Some(tokio::spawn(connect_with_retry(gateway, delay)));
    }

    fn on_update(&mut self, state: &AppState, update: ConnectionUpdate) {
        state.connection.update(&update);

        match update.state {
            ConnectionState::Open => {
                info!("WhatsApp session connected");
                self.attempts = 0;
            }
            ConnectionState::Connecting => info!("WhatsApp session connecting..."),
            ConnectionState::Close if update.should_reconnect() => {
                self.attempts += 1;
                let delay = reconnect_delay(self.attempts);
                warn!(
                    "Session closed (status {:?}), reconnecting in {:?}",
                    update.status_code, delay
                );
                self.schedule(state.gateway.clone(), delay);
            }
            ConnectionState::Close => {
                error!(
                    "Session logged out (status {:?}); not reconnecting. Pair the bridge again.",
                    update.status_code
                );
            }
        }
    }
}

/// Call `connect` after `delay`, backing off until it succeeds.
async fn connect_with_retry(gateway: Arc<dyn Gateway>, mut delay: Duration) {
    loop {
        tokio::time::sleep(delay).await;
        match gateway.connect().await {
            Ok(()) => return,
            Err(e) => {
                delay = (delay * 2).clamp(RECONNECT_BASE, RECONNECT_MAX);
                warn!("Connect request failed: {}; retrying in {:?}", e, delay);
            }
        }
    }
}

/// Run the event loop until the event channel closes.
///
/// Messages and membership events each get their own task so a slow
/// handler never holds up the rest of the traffic.
pub async fn run(state: AppState, mut rx: mpsc::Receiver<GatewayEvent>) {
    let mut supervisor = Supervisor::new();
    supervisor.schedule(state.gateway.clone(), Duration::ZERO);

    info!("Event loop started");

    while let Some(event) = rx.recv().await {
        match event {
            GatewayEvent::Message(msg) => {
                let state = state.clone();
                tokio::spawn(async move { dispatcher::handle_message(&state, msg).await });
            }
            GatewayEvent::GroupParticipants(update) => {
                let state = state.clone();
                tokio::spawn(async move {
                    events::handle_participants_update(&state, update).await
                });
            }
            GatewayEvent::Connection(update) => supervisor.on_update(&state, update),
        }
    }

    info!("Event channel closed, stopping event loop");
}
