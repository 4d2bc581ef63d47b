//! Lock screen configuration persistence
//!
//! Tunables that used to be compiled in (capture window, acceptance
//! threshold, the keyboard fallback secret) live here with their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{ACCEPT_THRESHOLD, CAPTURE_WINDOW, CREDENTIAL_FILE_NAME, STATUS_MAX_CHARS, STATUS_TTL};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "mousepass";

/// Lock screen configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LockConfig {
    /// Length of a gesture capture session in seconds
    #[serde(default = "default_capture_window_secs")]
    pub capture_window_secs: f64,

    /// Verification unlocks when the similarity is strictly above this
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: f64,

    /// Seconds a status message stays visible
    #[serde(default = "default_status_ttl_secs")]
    pub status_ttl_secs: f64,

    /// Longest status text shown to the user
    #[serde(default = "default_status_max_chars")]
    pub status_max_chars: usize,

    /// Plaintext keyboard fallback secret.
    ///
    /// NOT SECURE: stored and compared as plain text. Prefer
    /// `keyboard_secret_hash`, or set both to `null` to disable typing.
    #[serde(default = "default_keyboard_secret")]
    pub keyboard_secret: Option<String>,

    /// Argon2 PHC hash of the keyboard secret; wins over `keyboard_secret`
    #[serde(default)]
    pub keyboard_secret_hash: Option<String>,

    /// Maximum number of typed characters kept
    #[serde(default = "default_keyboard_buffer_max")]
    pub keyboard_buffer_max: usize,

    /// Credential file location (defaults to the config directory)
    #[serde(default)]
    pub credential_path: Option<PathBuf>,

    /// Sleep between polls when no input is pending, in milliseconds
    #[serde(default = "default_idle_poll_millis")]
    pub idle_poll_millis: u64,
}

fn default_capture_window_secs() -> f64 {
    CAPTURE_WINDOW.as_secs_f64()
}

fn default_accept_threshold() -> f64 {
    ACCEPT_THRESHOLD
}

fn default_status_ttl_secs() -> f64 {
    STATUS_TTL.as_secs_f64()
}

fn default_status_max_chars() -> usize {
    STATUS_MAX_CHARS
}

fn default_keyboard_secret() -> Option<String> {
    Some("123".to_string())
}

fn default_keyboard_buffer_max() -> usize {
    63
}

fn default_idle_poll_millis() -> u64 {
    10
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            capture_window_secs: default_capture_window_secs(),
            accept_threshold: default_accept_threshold(),
            status_ttl_secs: default_status_ttl_secs(),
            status_max_chars: default_status_max_chars(),
            keyboard_secret: default_keyboard_secret(),
            keyboard_secret_hash: None,
            keyboard_buffer_max: default_keyboard_buffer_max(),
            credential_path: None,
            idle_poll_millis: default_idle_poll_millis(),
        }
    }
}

impl LockConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        // Try XDG_CONFIG_HOME first, then fall back to ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            if !xdg_config.is_empty() {
                return Some(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
            }
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location
    ///
    /// Returns default configuration if file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file: {}", e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path().ok_or(Error::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Where the reference credential lives
    pub fn resolved_credential_path(&self) -> PathBuf {
        self.credential_path.clone().unwrap_or_else(|| {
            Self::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(CREDENTIAL_FILE_NAME)
        })
    }

    /// Capture window as a duration
    pub fn capture_window(&self) -> Duration {
        secs_or(self.capture_window_secs, CAPTURE_WINDOW)
    }

    /// Status lifetime as a duration
    pub fn status_ttl(&self) -> Duration {
        secs_or(self.status_ttl_secs, STATUS_TTL)
    }

    /// Idle sleep of the control loop
    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_millis)
    }
}

fn secs_or(secs: f64, fallback: Duration) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or_else(|_| {
        tracing::warn!(secs, "Invalid duration in config, using default");
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = LockConfig::default();
        assert_eq!(config.capture_window(), Duration::from_secs(5));
        assert_eq!(config.accept_threshold, 0.90);
        assert_eq!(config.status_ttl(), Duration::from_secs(3));
        assert_eq!(config.status_max_chars, 127);
        assert_eq!(config.keyboard_secret.as_deref(), Some("123"));
        assert!(config.keyboard_secret_hash.is_none());
        assert_eq!(config.keyboard_buffer_max, 63);
        assert_eq!(config.idle_poll(), Duration::from_millis(10));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: LockConfig =
            serde_json::from_str(r#"{ "accept_threshold": 0.8, "keyboard_secret": null }"#)
                .unwrap();

        assert_eq!(parsed.accept_threshold, 0.8);
        assert!(parsed.keyboard_secret.is_none());
        assert_eq!(parsed.capture_window(), Duration::from_secs(5));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("mousepass/config.json");

        let config = LockConfig {
            capture_window_secs: 4.0,
            credential_path: Some(PathBuf::from("/var/lib/mousepass/cred.dat")),
            ..LockConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = LockConfig::load_from(&path);
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.resolved_credential_path(),
            PathBuf::from("/var/lib/mousepass/cred.dat")
        );
    }

    #[test]
    fn test_unparsable_file_falls_back() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(LockConfig::load_from(&path), LockConfig::default());
    }

    #[test]
    fn test_negative_window_falls_back() {
        let config = LockConfig {
            capture_window_secs: -1.0,
            ..LockConfig::default()
        };
        assert_eq!(config.capture_window(), CAPTURE_WINDOW);
    }
}
