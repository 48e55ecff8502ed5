use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_INPUT_FILE, DEFAULT_LOG_DIR, DEFAULT_OUTPUT_FILE};
use crate::error::{CleanerError, Result};

/// Run configuration, normally read from `cleaner.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub io: IoConfig,
    pub rules: RulesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Where to write the JSON coverage report, if anywhere
    pub report: Option<PathBuf>,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            report: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Replaces the built-in rule tables when set
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl Config {
    /// Load a config file. A missing file yields the defaults; a malformed one is an error.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CleanerError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
