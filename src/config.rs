//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-recognition\config.toml
//! - macOS: ~/Library/Application Support/music-recognition/config.toml
//! - Linux: ~/.config/music-recognition/config.toml
//!
//! The config is loaded once at startup and passed by reference into each
//! component. Nothing reads credentials from the environment on its own;
//! `main` folds `AUDD_API_TOKEN` / `APIFY_TOKEN` in via the CLI layer.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::recognition::Platform;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Recognition provider settings
    pub provider: ProviderConfig,

    /// Job platform settings
    pub platform: PlatformConfig,

    /// Web UI settings
    pub server: ServerConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// AudD API token for recognition requests
    pub audd_api_token: Option<String>,

    /// Apify API token for running the recognition actor
    pub apify_token: Option<String>,
}

/// Recognition provider (AudD) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Recognition endpoint
    pub endpoint: String,

    /// Platforms to request metadata for
    pub return_sources: Vec<Platform>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.audd.io/".to_string(),
            return_sources: vec![Platform::Spotify, Platform::AppleMusic],
            timeout_secs: 60,
        }
    }
}

/// Job platform (Apify) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// API root, without trailing slash
    pub base_url: String,

    /// Actor that runs the recognition job (`username~actor-name`)
    pub actor_id: String,

    /// `waitForFinish` passed when creating a run. Keep it below
    /// `request_timeout_secs` or the submit call times out first.
    pub wait_for_finish_secs: u64,

    /// Timeout for each platform request in seconds
    pub request_timeout_secs: u64,

    /// Delay between status polls in seconds
    pub poll_interval_secs: u64,

    /// Give up after this many status polls (unset = no limit)
    pub max_poll_attempts: Option<u32>,

    /// Give up after waiting this long in seconds (unset = no limit)
    pub max_wait_secs: Option<u64>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.apify.com/v2".to_string(),
            actor_id: "philip.boyedoku~apify-music-recognition".to_string(),
            wait_for_finish_secs: 0,
            request_timeout_secs: 30,
            poll_interval_secs: 2,
            max_poll_attempts: None,
            max_wait_secs: Some(600),
        }
    }
}

impl PlatformConfig {
    /// Reject settings the poll loop can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait_secs.map(Duration::from_secs)
    }
}

/// Web UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the web UI listens on
    pub bind: String,

    /// Largest request body accepted by `/api/recognize`, in bytes.
    /// Uploaded audio arrives base64-encoded, so this is about 4/3 of the
    /// largest audio file.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-recognition"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::warn!("Could not determine config directory, using defaults");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the given path
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

impl Credentials {
    /// AudD token, or an error naming the missing setting
    pub fn require_audd(&self) -> Result<&str, ConfigError> {
        self.audd_api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingCredential("audd_api_token (AUDD_API_TOKEN)"))
    }

    /// Apify token, or an error naming the missing setting
    pub fn require_apify(&self) -> Result<&str, ConfigError> {
        self.apify_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingCredential("apify_token (APIFY_TOKEN)"))
    }
}

// ============================================================================
// Tests
// ============================================================================
