//! Configuration management for imgvault.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. The loaded `Config` is handed to each service at startup; nothing
//! reads configuration from globals.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for imgvault.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage service settings
    pub storage: StorageConfig,

    /// Rotation service listener
    pub rotation: RotationConfig,

    /// Resizing service listener
    pub resizing: ResizingConfig,

    /// Outbound storage client used by the transform services
    pub client: ClientConfig,

    /// Image encoding defaults
    pub images: ImagesConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.imgvault.imgvault/config.toml
    /// - Linux: ~/.config/imgvault/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\imgvault\config\config.toml
    ///
    /// Falls back to ~/.imgvault/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "imgvault", "imgvault")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".imgvault").join("config.toml")
            })
    }

    /// Get the resolved document directory for the file backend (with ~ expansion).
    pub fn data_dir(&self) -> PathBuf {
        let path_str = self.storage.data_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
