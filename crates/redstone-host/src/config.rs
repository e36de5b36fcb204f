use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

const APP_NAME: &str = "redstone";

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Config file not found")]
    NotFound,

    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_true() -> bool {
    true
}

fn default_registration_timeout_ms() -> u64 {
    5000
}

fn default_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to `<data_dir>/logs/<component>.log`
    #[serde(default)]
    pub file: bool,

    /// Filter used when `RUST_LOG` is not set
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: false,
            filter: default_filter(),
        }
    }
}

/// Settings for one embedded runtime instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Run the runtime's engine on a merged task runner driven by the host tick
    #[serde(default)]
    pub merged_task_runner: bool,

    /// How long the registry-open phase waits for the runtime to finish queueing
    #[serde(default = "default_registration_timeout_ms")]
    pub registration_timeout_ms: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            merged_task_runner: false,
            registration_timeout_ms: default_registration_timeout_ms(),
        }
    }
}

impl BridgeSettings {
    pub fn registration_timeout(&self) -> Duration {
        Duration::from_millis(self.registration_timeout_ms)
    }
}

fn default_bridges() -> BTreeMap<String, BridgeSettings> {
    BTreeMap::from([
        ("server".to_string(), BridgeSettings::default()),
        (
            "client".to_string(),
            BridgeSettings {
                merged_task_runner: true,
                ..BridgeSettings::default()
            },
        ),
    ])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Host tick period in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// One entry per embedded runtime, keyed by bridge name
    #[serde(default = "default_bridges")]
    pub bridges: BTreeMap<String, BridgeSettings>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            logging: LoggingConfig::default(),
            bridges: default_bridges(),
        }
    }
}

impl HostConfig {
    /// `<config_dir>/config.toml`, or `None` when there is no home directory
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Enabled bridges in name order
    pub fn enabled_bridges(&self) -> impl Iterator<Item = (&str, &BridgeSettings)> {
        self.bridges
            .iter()
            .filter(|(_, settings)| settings.enabled)
            .map(|(name, settings)| (name.as_str(), settings))
    }

    pub fn load() -> Result<Self, ConfigLoadError> {
        let path = Self::config_path().ok_or(ConfigLoadError::NotFound)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigLoadError> {
        if !path.exists() {
            return Err(ConfigLoadError::NotFound);
        }

        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        info!(target: "host", "Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigLoadError> {
        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!(target: "host", "Saved config to {}", path.display());
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Data directory for logs and other runtime files
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}
