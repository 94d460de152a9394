//! Configuration module for the bot.
//!
//! Loads configuration from environment variables (and `.env`).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default leveling page scraped by the `leveling` command.
pub const DEFAULT_LEVELING_URL: &str = "https://coryn.club/leveling.php";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Admin console
    pub port: u16,
    /// Base URL under which uploaded images are reachable by the bridge.
    pub public_url: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,

    // Storage
    pub settings_path: PathBuf,

    // Bridge
    pub bridge_url: String,
    /// Bearer token sent with every bridge request.
    pub bridge_token: Option<String>,
    /// Shared secret the bridge must present when posting events.
    pub bridge_secret: Option<String>,

    // Commands
    pub leveling_url: String,
    pub leveling_gap: u32,
    pub locale: String,

    /// Pause between consecutive welcome/leave messages.
    pub member_event_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Returns error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port: u16 = parse_var("PORT", 3000)?;

        let public_url = env::var("PUBLIC_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        Ok(Self {
            port,
            public_url: public_url.trim_end_matches('/').to_string(),
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./uploads".to_string())
                .into(),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", 1_000_000)?,
            settings_path: env::var("SETTINGS_PATH")
                .unwrap_or_else(|_| "./settings.json".to_string())
                .into(),
            bridge_url: env::var("BRIDGE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            bridge_token: optional_var("BRIDGE_TOKEN"),
            bridge_secret: optional_var("BRIDGE_SECRET"),
            leveling_url: env::var("LEVELING_URL")
                .unwrap_or_else(|_| DEFAULT_LEVELING_URL.to_string()),
            leveling_gap: parse_var("LEVELING_GAP", 7)?,
            locale: env::var("BOT_LOCALE")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|_| "id".to_string()),
            member_event_delay: Duration::from_millis(parse_var("MEMBER_EVENT_DELAY_MS", 1000)?),
        })
    }
}

/// Read a non-empty variable.
fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_default_when_unset() {
        let value: u32 = parse_var("WABOT_TEST_UNSET_GAP", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_var_rejects_non_numeric() {
        // SAFETY: the key is unique to this test
        unsafe { env::set_var("WABOT_TEST_BAD_PORT", "abc") };
        let err = parse_var::<u16>("WABOT_TEST_BAD_PORT", 3000).unwrap_err();
        assert!(err.to_string().contains("WABOT_TEST_BAD_PORT"));
    }

    #[test]
    fn test_blank_var_is_unset() {
        // SAFETY: the key is unique to this test
        unsafe { env::set_var("WABOT_TEST_BLANK_TOKEN", "   ") };
        assert_eq!(optional_var("WABOT_TEST_BLANK_TOKEN"), None);
    }
}
