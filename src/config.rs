//! Configuration management for sglog

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::DEFAULT_MAX_FILE_COUNT;

/// Log directory below the root, as used by the app
pub const SG_LOGS_PATH: &str = "logs/app-logs-sg";

/// Name of the data root below the config directory
const ROOT_DIR_NAME: &str = "telegram-data";

/// Name of the config file below the config directory
const CONFIG_FILE_NAME: &str = "sglog.toml";

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Root for prefixed log collection
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Directory log files are written to
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,

    /// Size at which the current file is rotated (default: 2 MiB)
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Secondary size cap (default: 1 MiB). Not used by the write path.
    #[serde(default = "default_max_short_file_bytes")]
    pub max_short_file_bytes: u64,

    /// Number of files kept before the oldest is deleted (default: 20)
    #[serde(default = "default_max_file_count")]
    pub max_file_count: usize,

    #[serde(default = "default_true")]
    pub log_to_file: bool,

    #[serde(default = "default_true")]
    pub log_to_console: bool,

    #[serde(default = "default_true")]
    pub redact_sensitive_data: bool,
}

fn default_root_path() -> PathBuf {
    config_dir().join(ROOT_DIR_NAME)
}

fn default_base_path() -> PathBuf {
    default_root_path().join(SG_LOGS_PATH)
}

fn default_max_file_bytes() -> u64 {
    2 * 1024 * 1024
}

fn default_max_short_file_bytes() -> u64 {
    1024 * 1024
}

fn default_max_file_count() -> usize {
    DEFAULT_MAX_FILE_COUNT
}

fn default_true() -> bool {
    true
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::for_root(default_root_path())
    }
}

impl LoggerConfig {
    /// Default configuration with logs under `root/logs/app-logs-sg`
    pub fn for_root(root_path: PathBuf) -> Self {
        Self {
            base_path: root_path.join(SG_LOGS_PATH),
            root_path,
            max_file_bytes: default_max_file_bytes(),
            max_short_file_bytes: default_max_short_file_bytes(),
            max_file_count: default_max_file_count(),
            log_to_file: true,
            log_to_console: true,
            redact_sensitive_data: true,
        }
    }

    /// Load configuration from the default file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from `path`, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Ensure the log directory exists
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_path).context("Failed to create logs directory")?;
        Ok(())
    }
}

/// Get the base configuration directory (~/.swiftgram)
/// Falls back to ./.swiftgram if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".swiftgram")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".swiftgram"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}
