//! Configuration file support.
//!
//! Settings are read from a TOML file and then overridden from the
//! environment:
//!
//! ```toml
//! [bootstrap]
//! path = "data/conference.json"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! # Environment Variables
//!
//! - `SCHEDULE_CONFIG`: explicit path of the TOML file
//! - `SCHEDULE_BOOTSTRAP_PATH`: overrides `bootstrap.path`

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};

pub const CONFIG_PATH_ENV: &str = "SCHEDULE_CONFIG";
pub const BOOTSTRAP_PATH_ENV: &str = "SCHEDULE_BOOTSTRAP_PATH";

/// Store configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub bootstrap: BootstrapSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapSettings {
    /// JSON file with the seed schedules. Without it the store starts empty.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn config_error(message: String, path: &Path) -> RepositoryError {
    RepositoryError::configuration_with_context(
        message,
        ErrorContext::new("load_config").with_details(path.display().to_string()),
    )
}

fn default_config_path() -> Option<PathBuf> {
    [
        PathBuf::from("schedule.toml"),
        PathBuf::from("backend/schedule.toml"),
        PathBuf::from("../schedule.toml"),
    ]
    .into_iter()
    .find(|path| path.exists())
}

impl StoreConfig {
    /// Load configuration from a TOML file.
    ///
    /// A relative `bootstrap.path` is resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e), path))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| config_error(format!("Failed to parse config file: {}", e), path))?;

        let resolved = match (&config.bootstrap.path, path.parent()) {
            (Some(bootstrap), Some(dir)) if bootstrap.is_relative() => Some(dir.join(bootstrap)),
            _ => None,
        };
        if resolved.is_some() {
            config.bootstrap.path = resolved;
        }
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `schedule.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> RepositoryResult<Self> {
        match default_config_path() {
            Some(path) => Self::from_file(path),
            None => Err(RepositoryError::configuration(
                "No schedule.toml found in standard locations",
            )),
        }
    }

    /// Resolve the effective configuration.
    ///
    /// Uses `SCHEDULE_CONFIG` if set, else the first `schedule.toml` found,
    /// else defaults; then applies environment overrides. A config file that
    /// exists but cannot be parsed is an error.
    pub fn load() -> RepositoryResult<Self> {
        let path = env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(default_config_path);
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Apply `SCHEDULE_BOOTSTRAP_PATH` on top of file settings.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = env::var(BOOTSTRAP_PATH_ENV) {
            if !path.is_empty() {
                self.bootstrap.path = Some(PathBuf::from(path));
            }
        }
        self
    }

    /// Configured log level; unknown names fall back to INFO.
    pub fn log_level(&self) -> Level {
        self.logging.level.parse().unwrap_or(Level::INFO)
    }
}
