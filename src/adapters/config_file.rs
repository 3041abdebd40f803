//! JSON config file adapter.
//!
//! Implements [`ConfigPort`] over a JSON file on disk. Absent file
//! means first run — the caller falls back to defaults. Values are
//! range-checked before being handed to the rest of the system.

use std::path::PathBuf;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

/// Reads [`SystemConfig`] from a JSON file.
pub struct ConfigFileAdapter {
    path: PathBuf,
}

impl ConfigFileAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ConfigPort for ConfigFileAdapter {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound);
            }
            Err(_) => return Err(ConfigError::IoError),
        };

        let config: SystemConfig =
            serde_json::from_str(&data).map_err(|_| ConfigError::Corrupted)?;
        config.validate().map_err(ConfigError::ValidationFailed)?;
        Ok(config)
    }
}
