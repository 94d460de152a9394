//! Bot module - event loop, dispatch and the bridge webhook.

pub mod dispatcher;
mod runtime;
pub mod webhook;

pub use dispatcher::AppState;
pub use runtime::{run, ConnectionSnapshot, ConnectionStatus};
