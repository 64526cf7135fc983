//! Runtime configuration loaded from environment variables.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `BLOGPOST_DB_PATH` | SQLite file path | in-memory database |
//! | `BLOGPOST_BUSY_TIMEOUT_MS` | writer lock wait before conflict | 5000 |
//! | `BLOGPOST_LOG_LEVEL` | `trace`..`error` | build-mode default |
//! | `BLOGPOST_LOG_DIR` | absolute log directory | logging disabled |

use crate::db::DbOptions;
use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "BLOGPOST_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "BLOGPOST_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "BLOGPOST_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BLOGPOST_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable is set but its value cannot be parsed.
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for {key}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved configuration for opening storage and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// `None` selects a private in-memory database.
    pub db_path: Option<PathBuf>,
    pub db_options: DbOptions,
    pub log_level: &'static str,
    /// `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            db_options: DbOptions::default(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        config.db_path = read(ENV_DB_PATH).map(PathBuf::from);

        if let Some(value) = read(ENV_BUSY_TIMEOUT_MS) {
            let millis = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_BUSY_TIMEOUT_MS,
                value: value.clone(),
            })?;
            config.db_options.busy_timeout = Duration::from_millis(millis);
        }

        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&value).map_err(|_| ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL,
                value: value.clone(),
            })?;
        }

        if let Some(value) = read(ENV_LOG_DIR) {
            let dir = PathBuf::from(&value);
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_LOG_DIR,
                    value,
                });
            }
            config.log_dir = Some(dir);
        }

        Ok(config)
    }
}
