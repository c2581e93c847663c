// SPDX-License-Identifier: MPL-2.0
//! SDK configuration, loaded from and saved to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use shakenbake::config::{self, SdkConfig};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Redact the network section from every report
//! config.redaction.patterns.push("network".to_string());
//!
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::console::ConsoleCapacity;
pub use defaults::*;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "ShakeNbake";

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    pub console: ConsoleConfig,
    pub redaction: RedactionConfig,
    pub app: AppConfig,
}

/// Ring buffer sizes for the console interceptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub max_logs: usize,
    pub max_errors: usize,
    pub max_rejections: usize,
    /// Replace file system paths in captured messages with `<path>`.
    pub scrub_paths: bool,
}

impl ConsoleConfig {
    #[must_use]
    pub fn logs_capacity(&self) -> ConsoleCapacity {
        ConsoleCapacity::new(self.max_logs)
    }

    #[must_use]
    pub fn errors_capacity(&self) -> ConsoleCapacity {
        ConsoleCapacity::new(self.max_errors)
    }

    #[must_use]
    pub fn rejections_capacity(&self) -> ConsoleCapacity {
        ConsoleCapacity::new(self.max_rejections)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_logs: DEFAULT_MAX_LOGS,
            max_errors: DEFAULT_MAX_ERRORS,
            max_rejections: DEFAULT_MAX_REJECTIONS,
            scrub_paths: false,
        }
    }
}

/// Context redaction applied before a report is built.
///
/// Patterns are `section`, `section.field` or `section.*`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactionConfig {
    pub patterns: Vec<String>,
}

/// Host application identification for the `app` context section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub version: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            version: None,
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<SdkConfig, ConfigError> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(SdkConfig::default())
}

pub fn save(config: &SdkConfig) -> Result<(), ConfigError> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads the configuration at `path`.
///
/// Unparseable files yield the default configuration; only I/O failures are
/// reported.
pub fn load_from_path(path: &Path) -> Result<SdkConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), %err, "invalid config file, using defaults");
        SdkConfig::default()
    }))
}

pub fn save_to_path(config: &SdkConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
