//! Application-level configuration loading: the allowed collection names and
//! the default database name.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dao::collections::DEFAULT_COLLECTIONS;

/// Default location on disk where the configuration JSON is looked up.
const DEFAULT_CONFIG_PATH: &str = "config/game-data.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GAME_DATA_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    collections: Vec<String>,
    database: Option<String>,
}

impl AppConfig {
    /// Load the configuration from the default location (or the environment override),
    /// falling back to the built-in collections.
    pub fn load() -> Self {
        Self::load_from(&resolve_config_path())
    }

    /// Load the configuration from `path`, falling back to the built-in collections.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        count = app_config.collections.len(),
                        "loaded allowed collections from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Collection names game models may be bound to.
    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    /// Database to use when the connection settings name none.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collections: default_collections(),
            database: None,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    collections: Option<Vec<String>>,
    #[serde(default)]
    database: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            collections: value.collections.unwrap_or_else(default_collections),
            database: value.database.filter(|name| !name.is_empty()),
        }
    }
}

fn default_collections() -> Vec<String> {
    DEFAULT_COLLECTIONS
        .iter()
        .map(|name| (*name).to_owned())
        .collect()
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
