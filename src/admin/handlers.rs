//! Console request handlers.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use super::page::render_index;
use super::AdminState;
use crate::database::{CannedMessage, StoreError};

/// Console handler failures.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    BadUpload(String),

    #[error(transparent)]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = match &self {
            AdminError::Store(_) | AdminError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AdminError::BadUpload(_) => StatusCode::BAD_REQUEST,
            AdminError::Multipart(e) => e.status(),
        };

        if status.is_server_error() {
            error!("Console request failed: {}", self);
        } else {
            warn!("Console request rejected: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}

type AdminResult = Result<Redirect, AdminError>;

fn back() -> Redirect {
    Redirect::to("/")
}

/// Field value if present and non-empty.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeForm {
    welcome_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveForm {
    leave_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommandForm {
    command: Option<String>,
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCommandForm {
    old_command: Option<String>,
    new_command: Option<String>,
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommandNameForm {
    command: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PrefixForm {
    prefix: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPrefixForm {
    old_prefix: Option<String>,
    new_prefix: Option<String>,
}

/// GET / - status and settings overview.
pub async fn index(State(state): State<AdminState>) -> Html<String> {
    let settings = state.settings.get();
    let connection = state.connection.snapshot();
    Html(render_index(&settings, &connection))
}

pub async fn update_welcome(
    State(state): State<AdminState>,
    Form(form): Form<WelcomeForm>,
) -> AdminResult {
    if let Some(message) = present(&form.welcome_message) {
        state.settings.mutate(|s| s.welcome_message = message.to_string())?;
        info!("Welcome message updated");
    }
    Ok(back())
}

pub async fn update_leave(
    State(state): State<AdminState>,
    Form(form): Form<LeaveForm>,
) -> AdminResult {
    if let Some(message) = present(&form.leave_message) {
        state.settings.mutate(|s| s.leave_message = message.to_string())?;
        info!("Leave message updated");
    }
    Ok(back())
}

pub async fn add_command(
    State(state): State<AdminState>,
    Form(form): Form<CommandForm>,
) -> AdminResult {
    if let (Some(command), Some(response)) = (present(&form.command), present(&form.response)) {
        state.settings.mutate(|s| s.set_command(command, response))?;
        info!("Command '{}' saved", command);
    }
    Ok(back())
}

pub async fn edit_command(
    State(state): State<AdminState>,
    Form(form): Form<EditCommandForm>,
) -> AdminResult {
    let fields = (
        present(&form.old_command),
        present(&form.new_command),
        present(&form.response),
    );
    if let (Some(old), Some(new), Some(response)) = fields {
        if state.settings.get().commands.contains_key(old) {
            state.settings.mutate(|s| {
                s.edit_command(old, new, response);
            })?;
            info!("Command '{}' renamed to '{}'", old, new);
        }
    }
    Ok(back())
}

pub async fn remove_command(
    State(state): State<AdminState>,
    Form(form): Form<CommandNameForm>,
) -> AdminResult {
    if let Some(command) = present(&form.command) {
        state.settings.mutate(|s| {
            s.remove_command(command);
        })?;
        info!("Command '{}' removed", command);
    }
    Ok(back())
}

pub async fn add_prefix(
    State(state): State<AdminState>,
    Form(form): Form<PrefixForm>,
) -> AdminResult {
    if let Some(prefix) = present(&form.prefix) {
        if !state.settings.get().prefixes.iter().any(|p| p == prefix) {
            state.settings.mutate(|s| {
                s.add_prefix(prefix);
            })?;
            info!("Prefix '{}' added", prefix);
        }
    }
    Ok(back())
}

pub async fn edit_prefix(
    State(state): State<AdminState>,
    Form(form): Form<EditPrefixForm>,
) -> AdminResult {
    if let (Some(old), Some(new)) = (present(&form.old_prefix), present(&form.new_prefix)) {
        let mut edited = false;
        state.settings.mutate(|s| edited = s.edit_prefix(old, new))?;
        if edited {
            info!("Prefix '{}' changed to '{}'", old, new);
        }
    }
    Ok(back())
}

pub async fn remove_prefix(
    State(state): State<AdminState>,
    Form(form): Form<PrefixForm>,
) -> AdminResult {
    if let Some(prefix) = present(&form.prefix) {
        let settings = state.settings.mutate(|s| {
            s.remove_prefix(prefix);
        })?;
        info!("Prefix '{}' removed", prefix);
        if settings.prefixes.is_empty() {
            warn!("No prefixes left; chat commands are disabled");
        }
    }
    Ok(back())
}

/// Normalized extension of an accepted image file name.
pub fn image_extension(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" => Some("jpg"),
        "jpeg" => Some("jpeg"),
        "png" => Some("png"),
        _ => None,
    }
}

fn too_large(limit: usize) -> AdminError {
    AdminError::BadUpload(format!("Image is larger than {} bytes", limit))
}

/// A body cut off by the request size limit is a rejected upload.
fn read_error(e: MultipartError, limit: usize) -> AdminError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(limit)
    } else {
        AdminError::Multipart(e)
    }
}

/// File name of an image served from our upload directory.
fn local_upload<'a>(image_url: &'a str, public_url: &str) -> Option<&'a str> {
    let name = image_url.strip_prefix(public_url)?.strip_prefix('/')?;
    let safe = !name.is_empty() && !name.contains('/') && !name.contains('\\') && name != "..";
    safe.then_some(name)
}

/// POST /add-command-image - multipart `command`, `caption`, `imageUrl` (file).
pub async fn add_command_image(
    State(state): State<AdminState>,
    mut multipart: Multipart,
) -> AdminResult {
    let mut command = None;
    let mut caption = None;
    let mut image = None;
    let limit = state.max_upload_bytes;

    while let Some(field) = multipart.next_field().await.map_err(|e| read_error(e, limit))? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "command" => command = Some(field.text().await.map_err(|e| read_error(e, limit))?),
            "caption" => caption = Some(field.text().await.map_err(|e| read_error(e, limit))?),
            "imageUrl" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let ext = image_extension(&file_name)
                    .ok_or_else(|| AdminError::BadUpload("Please upload an image".to_string()))?;
                let data = field.bytes().await.map_err(|e| read_error(e, limit))?;
                if data.len() > limit {
                    return Err(too_large(limit));
                }
                image = Some((ext, data));
            }
            _ => {}
        }
    }

    let (ext, data) = image
        .filter(|(_, data)| !data.is_empty())
        .ok_or_else(|| AdminError::BadUpload("Please upload an image".to_string()))?;

    let Some(command) = present(&command) else {
        return Ok(back());
    };
    let caption = present(&caption);

    let file_name = format!("{}.{}", uuid::Uuid::new_v4().simple(), ext);
    tokio::fs::create_dir_all(state.upload_dir.as_path()).await?;
    let path = state.upload_dir.join(&file_name);
    tokio::fs::write(&path, &data).await?;

    let image_url = format!("{}/{}", state.public_url, file_name);
    let mut replaced = None;
    let saved = state.settings.mutate(|s| {
        replaced = s.remove_message(command);
        s.set_image_command(command, &image_url, caption);
    });
    if let Err(e) = saved {
        let _ = tokio::fs::remove_file(&path).await;
        return Err(e.into());
    }

    info!("Image command '{}' saved as {}", command, file_name);
    delete_upload(&state, replaced).await;
    Ok(back())
}

/// Delete the local file behind a replaced or removed image entry.
async fn delete_upload(state: &AdminState, entry: Option<CannedMessage>) {
    if let Some(CannedMessage::Image { image_url, .. }) = entry {
        if let Some(name) = local_upload(&image_url, &state.public_url) {
            if let Err(e) = tokio::fs::remove_file(state.upload_dir.join(name)).await {
                warn!("Could not delete upload {}: {}", name, e);
            }
        }
    }
}

/// POST /remove-command-image - also deletes the uploaded file.
pub async fn remove_command_image(
    State(state): State<AdminState>,
    Form(form): Form<CommandNameForm>,
) -> AdminResult {
    let Some(command) = present(&form.command) else {
        return Ok(back());
    };

    let mut removed = None;
    state.settings.mutate(|s| removed = s.remove_message(command))?;
    info!("Image command '{}' removed", command);

    delete_upload(&state, removed).await;
    Ok(back())
}
