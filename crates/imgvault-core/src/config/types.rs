//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::format::ImageFormatKind;

/// Persistence backend behind the storage service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process map; contents are lost on restart
    #[default]
    Memory,
    /// One JSON document per asset under `storage.data_dir`
    File,
}

/// Storage service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Document backend
    pub backend: BackendKind,

    /// Directory for the file backend
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            backend: BackendKind::Memory,
            data_dir: PathBuf::from("~/.imgvault/images"),
        }
    }
}

/// Rotation service listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8081,
        }
    }
}

/// Resizing service listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizingConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ResizingConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8082,
        }
    }
}

/// How transform services reach the storage service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the storage service
    pub storage_url: String,

    /// Timeout for a single fetch, in milliseconds
    pub fetch_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            storage_url: "http://127.0.0.1:8080".to_string(),
            fetch_timeout_ms: 10_000,
        }
    }
}

/// Image encoding defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Output format when an asset's stored format cannot be encoded
    pub default_format: ImageFormatKind,
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum upload size in megabytes
    pub max_upload_size_mb: u64,

    /// Maximum resize target (width or height)
    pub max_image_dimension: u32,

    /// Timeout for decode + transform + encode, in milliseconds
    pub transform_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: 50,
            max_image_dimension: 10000,
            transform_timeout_ms: 30_000,
        }
    }
}

impl LimitsConfig {
    /// Upload limit in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: pretty, json
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
