//! Configuration module for fsq
//!
//! Manages application configuration: the interactive prompt, the row
//! cap for printed tables and quiet mode. Configuration is stored in
//! the user's config directory.

use std::fs;
use std::path::PathBuf;

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::output::DEFAULT_MAX_ROWS;

fn default_prompt() -> String {
    "fsq> ".to_string()
}

const fn default_max_display_rows() -> usize {
    DEFAULT_MAX_ROWS
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FsqConfig {
    /// Prompt string shown by the interactive shell
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Maximum number of result rows printed to the console
    #[serde(default = "default_max_display_rows")]
    pub max_display_rows: usize,

    /// Suppress informational output (banners, timing messages)
    #[serde(default)]
    pub quiet: bool,
}

impl Default for FsqConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            max_display_rows: default_max_display_rows(),
            quiet: false,
        }
    }
}

impl FsqConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be
    /// determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("fsq").join("config.toml"))
    }

    /// Load configuration from file, falling back to defaults when no
    /// config file exists yet.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let settings = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created,
    /// the configuration cannot be serialized to TOML, or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(&config_path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FsqConfig::default();
        assert_eq!(config.prompt, "fsq> ");
        assert_eq!(config.max_display_rows, DEFAULT_MAX_ROWS);
        assert!(!config.quiet);
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let config: FsqConfig = toml::from_str("quiet = true").unwrap();
        assert!(config.quiet);
        assert_eq!(config.prompt, "fsq> ");
        assert_eq!(config.max_display_rows, DEFAULT_MAX_ROWS);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = FsqConfig {
            prompt: ">> ".into(),
            max_display_rows: 10,
            quiet: true,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let reloaded: FsqConfig = toml::from_str(&text).unwrap();
        assert_eq!(reloaded.prompt, ">> ");
        assert_eq!(reloaded.max_display_rows, 10);
        assert!(reloaded.quiet);
    }
}
