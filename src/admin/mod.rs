//! Admin console.
//!
//! Form-driven pages for editing prefixes, commands, image commands and the
//! join/leave templates. Every mutating route redirects back to `/`.
//! There is no authentication; bind it to a trusted interface.

mod handlers;
mod page;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::bot::ConnectionStatus;
use crate::database::SettingsStore;

/// Upload size slack for multipart framing and text fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// State shared by console handlers.
#[derive(Clone)]
pub struct AdminState {
    pub settings: Arc<SettingsStore>,
    pub connection: Arc<ConnectionStatus>,
    /// Directory uploaded images are written to and served from.
    pub upload_dir: Arc<PathBuf>,
    /// Base URL prepended to uploaded file names.
    pub public_url: Arc<str>,
    pub max_upload_bytes: usize,
}

/// Build the console router. Uploaded images are served from `/`.
pub fn router(state: AdminState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes + MULTIPART_OVERHEAD);
    let uploads = ServeDir::new(state.upload_dir.as_path());

    Router::new()
        .route("/", get(handlers::index))
        .route("/update-welcome", post(handlers::update_welcome))
        .route("/update-leave", post(handlers::update_leave))
        .route("/add-command", post(handlers::add_command))
        .route("/edit-command", post(handlers::edit_command))
        .route("/remove-command", post(handlers::remove_command))
        .route("/add-prefix", post(handlers::add_prefix))
        .route("/edit-prefix", post(handlers::edit_prefix))
        .route("/remove-prefix", post(handlers::remove_prefix))
        .route(
            "/add-command-image",
            post(handlers::add_command_image).layer(upload_limit),
        )
        .route("/remove-command-image", post(handlers::remove_command_image))
        .fallback_service(uploads)
        .with_state(state)
}
