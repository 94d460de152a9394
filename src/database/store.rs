//! JSON-file settings store.
//!
//! The in-memory snapshot is the source of truth at runtime; the file is
//! only read at startup and rewritten after every mutation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tracing::{debug, info};

use super::models::Settings;

/// Settings persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Shared settings with single-writer updates.
pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<Arc<Settings>>,
    /// Serializes `mutate` calls so file writes land in order.
    writer: Mutex<()>,
}

impl SettingsStore {
    /// Load settings from `path`, writing the default document if absent.
    ///
    /// # Errors
    /// Fails if the file cannot be read/created or does not parse.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let settings = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?
        } else {
            info!("No settings at {}, writing defaults", path.display());
            let settings = Settings::default();
            write_settings(&path, &settings)?;
            settings
        };

        Ok(Self {
            path,
            current: RwLock::new(Arc::new(settings)),
            writer: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current snapshot.
    pub fn get(&self) -> Arc<Settings> {
        Arc::clone(&self.current.read())
    }

    /// Write `settings` to the backing file.
    ///
    /// # Errors
    /// Returns `StoreError::Io` if the medium is not writable.
    pub fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        write_settings(&self.path, settings)
    }

    /// Apply `f` to a copy of the current settings, persist it, then publish it.
    ///
    /// The in-memory snapshot is left untouched if persisting fails.
    ///
    /// The write is synchronous. The document is a few hundred bytes and
    /// only the admin console mutates it, so handlers call this directly
    /// instead of going through `spawn_blocking`. The writer lock is never
    /// held across an `.await`.
    pub fn mutate<F>(&self, f: F) -> Result<Arc<Settings>, StoreError>
    where
        F: FnOnce(&mut Settings),
    {
        let _guard = self.writer.lock();

        let mut next = Settings::clone(&self.get());
        f(&mut next);
        self.save(&next)?;

        let next = Arc::new(next);
        *self.current.write() = Arc::clone(&next);
        debug!("Settings updated and saved to {}", self.path.display());

        Ok(next)
    }
}

/// Pretty-print to a temp file next to `path`, then rename over it.
fn write_settings(path: &Path, settings: &Settings) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(settings)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;

    Ok(())
}
