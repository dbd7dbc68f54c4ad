//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_upload_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_upload_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.transform_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.transform_timeout_ms must be > 0".into(),
            ));
        }
        if self.client.fetch_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "client.fetch_timeout_ms must be > 0".into(),
            ));
        }
        if !(self.client.storage_url.starts_with("http://")
            || self.client.storage_url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(
                "client.storage_url must be an http(s) URL".into(),
            ));
        }
        Ok(())
    }
}
