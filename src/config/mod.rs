//! Persistent configuration and session-token stores.
//!
//! Two JSON records live under the per-user config directory: `config.json`
//! (server URL, username, default project/sprint) and `token.json` (the
//! cached authentication token with its expiry). Absence of either file is
//! a valid state, not an error.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Environment variable overriding the config directory location.
pub const CONFIG_DIR_ENV: &str = "TAIGA_CLI_CONFIG_DIR";

/// Config file name inside the config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Token file name inside the config directory.
pub const TOKEN_FILE: &str = "token.json";

/// How long a freshly issued token stays valid.
pub const TOKEN_TTL_HOURS: i64 = 2;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Error reading or writing a store file on disk.
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing or serialising a store file as JSON.
    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Provider for the on-disk location of the config and token files.
///
/// Injected into the session manager and command handlers so tests can
/// point the stores at a temp directory instead of the real home.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    dir: PathBuf,
}

impl ConfigPaths {
    /// Resolve the config directory from the environment.
    ///
    /// Honours `TAIGA_CLI_CONFIG_DIR` when set, otherwise uses the
    /// platform config directory (e.g. `~/.config/taiga-cli` on Linux,
    /// `~/Library/Application Support/taiga-cli` on macOS).
    pub fn from_env() -> Self {
        if let Some(dir) = env::var_os(CONFIG_DIR_ENV) {
            return Self {
                dir: PathBuf::from(dir),
            };
        }
        Self {
            dir: dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("taiga-cli"),
        }
    }

    /// Build a provider rooted at an explicit directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the config file.
    pub fn config_file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Path of the token file.
    pub fn token_file(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }
}

/// Persisted client configuration.
///
/// Written wholesale by `taiga config`; `default_project` and
/// `default_sprint` are mutated individually by the `set-default`
/// commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaigaConfig {
    /// Base URL of the Taiga instance (e.g. `https://taiga.example.com`).
    pub api_url: String,
    /// Username to authenticate as.
    pub username: String,
    /// Default project slug for commands that omit `--project`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
    /// Default sprint slug for commands that omit `--sprint`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sprint: Option<String>,
}

impl TaigaConfig {
    /// Create a fresh configuration with no defaults set.
    pub fn new(api_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            username: username.into(),
            default_project: None,
            default_sprint: None,
        }
    }

    /// Load the configuration, or `None` when not yet configured.
    pub fn load(paths: &ConfigPaths) -> Result<Option<Self>, StoreError> {
        load_json(&paths.config_file())
    }

    /// Save the configuration, replacing any previous record.
    pub fn save(&self, paths: &ConfigPaths) -> Result<(), StoreError> {
        save_json(&paths.config_file(), self)
    }
}

/// Cached authentication token with its expiry timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// Bearer token issued by the authentication endpoint.
    pub token: String,
    /// Instant the token stops being usable (ISO-8601).
    pub expiration: DateTime<Local>,
}

impl SessionToken {
    /// Wrap a freshly issued token, valid for [`TOKEN_TTL_HOURS`] from now.
    pub fn issue(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expiration: Local::now() + Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Whether the token is still usable at `now`.
    pub fn is_valid(&self, now: DateTime<Local>) -> bool {
        now < self.expiration
    }

    /// Load the cached token, or `None` when no token has been saved.
    pub fn load(paths: &ConfigPaths) -> Result<Option<Self>, StoreError> {
        load_json(&paths.token_file())
    }

    /// Save the token, superseding any previous one.
    pub fn save(&self, paths: &ConfigPaths) -> Result<(), StoreError> {
        save_json(&paths.token_file(), self)
    }
}

/// Read a JSON record, treating an absent file as `None`.
fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Write a JSON record as a complete overwrite.
///
/// Creates the parent directory if needed, and goes through a sibling
/// temp file plus rename so a crashed write never leaves a truncated
/// record behind.
fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
