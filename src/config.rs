//! Configuration file handling for txnview.
//!
//! The configuration file is stored at `$CONFIG_DIR/txnview/config.json` by default and holds the
//! settings of the simulated backend and of the search debounce. Every setting can be overridden
//! from the command line.

use crate::source::{DEFAULT_FAILURE_RATE, DEFAULT_LATENCY};
use crate::view_model::{ViewSettings, DEFAULT_DEBOUNCE};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const APP_NAME: &str = "txnview";
const CONFIG_VERSION: u8 = 1;

/// The `Config` object represents the configuration of the app: the file it was loaded from, if
/// any, and the settings after command line overrides have been applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    config_path: Option<PathBuf>,
    config_file: ConfigFile,
}

/// Settings from the command line that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub latency_ms: Option<u64>,
    pub failure_rate: Option<f64>,
    pub debounce_ms: Option<u64>,
    pub data_path: Option<PathBuf>,
}

impl Config {
    /// Loads and validates the config file at `path`.
    ///
    /// # Errors
    /// - The file does not exist or cannot be parsed.
    /// - A setting is out of range.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            bail!("The config file is missing '{}'", path.display())
        }
        let config_file = ConfigFile::load(&path).await?;
        let config = Self {
            config_path: Some(path),
            config_file,
        };
        config.validate()?;
        Ok(config)
    }

    /// Same as `load`, except that a missing file gives the default configuration.
    pub async fn load_or_default(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.is_file() {
            return Self::load(path).await;
        }
        debug!(
            "No config file at '{}', using default settings",
            path.display()
        );
        Ok(Self::default())
    }

    /// Applies command line settings on top of the file settings and validates the result.
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        let file = &mut self.config_file;
        if let Some(latency_ms) = overrides.latency_ms {
            file.latency_ms = latency_ms;
        }
        if let Some(failure_rate) = overrides.failure_rate {
            file.failure_rate = failure_rate;
        }
        if let Some(debounce_ms) = overrides.debounce_ms {
            file.debounce_ms = debounce_ms;
        }
        if let Some(data_path) = overrides.data_path {
            // relative to the working directory, unlike paths from the file
            file.data_path = Some(
                std::path::absolute(&data_path)
                    .with_context(|| format!("Unable to resolve '{}'", data_path.display()))?,
            );
        }
        self.validate()?;
        Ok(self)
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.config_file.latency_ms)
    }

    pub fn failure_rate(&self) -> f64 {
        self.config_file.failure_rate
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.config_file.debounce_ms)
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            debounce: self.debounce(),
        }
    }

    /// Returns the data file path if one is configured. A relative path is resolved against the
    /// directory holding the config file.
    pub fn data_path(&self) -> Option<PathBuf> {
        let path = self.config_file.data_path.as_ref()?;
        if path.is_absolute() {
            return Some(path.clone());
        }
        match self.config_path.as_deref().and_then(Path::parent) {
            Some(dir) => Some(dir.join(path)),
            None => Some(path.clone()),
        }
    }

    fn validate(&self) -> Result<()> {
        let rate = self.config_file.failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            bail!("failure_rate must be between 0 and 1, got {rate}");
        }
        if self.config_file.app_name != APP_NAME {
            bail!(
                "The config file belongs to '{}', expected '{APP_NAME}'",
                self.config_file.app_name
            );
        }
        if self.config_file.config_version > CONFIG_VERSION {
            bail!(
                "Config version {} is newer than the supported version {CONFIG_VERSION}",
                self.config_file.config_version
            );
        }
        Ok(())
    }
}

/// Represents the serialization and deserialization format of the configuration file. Missing
/// keys take their default values.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "txnview",
///   "config_version": 1,
///   "latency_ms": 1000,
///   "failure_rate": 0.05,
///   "debounce_ms": 300,
///   "data_path": "transactions.csv"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
struct ConfigFile {
    /// Application name, should always be "txnview"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Simulated network latency of every fetch, in milliseconds
    latency_ms: u64,

    /// Probability, between 0 and 1, that a fetch fails
    failure_rate: f64,

    /// How long the search query must be left alone before it is applied, in milliseconds
    debounce_ms: u64,

    /// CSV file to read transactions from instead of the built-in data
    #[serde(skip_serializing_if = "Option::is_none")]
    data_path: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            latency_ms: DEFAULT_LATENCY.as_millis() as u64,
            failure_rate: DEFAULT_FAILURE_RATE,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            data_path: None,
        }
    }
}

impl ConfigFile {
    async fn load(path: &Path) -> Result<Self> {
        utils::deserialize(path)
            .await
            .with_context(|| format!("Unable to load config file '{}'", path.display()))
    }
}
