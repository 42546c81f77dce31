//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(DriverConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main driver configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverConfig {
    pub connection: ConnectionConfig,
    pub device: DeviceConfig,
}

/// Printer connection settings (serial-over-TCP bridge).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    /// TCP port of the serial bridge (default: 9100).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Round-trip timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    9100
}

fn default_timeout_secs() -> u64 {
    10
}

/// Fiscal device settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device model name, selects per-model field-width overrides.
    pub model: String,
    /// Base year for two-digit date rollover (default: 1997).
    #[serde(default = "default_rollover_year")]
    pub rollover_year: i32,
    /// Default number of copies for document-closing commands.
    #[serde(default = "default_copies")]
    pub copies: u32,
}

fn default_rollover_year() -> i32 {
    1997
}

fn default_copies() -> u32 {
    1
}

impl DriverConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<DriverConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.host.trim().is_empty() {
            return Err(ConfigError::Validation("Connection host cannot be empty".to_string()));
        }
        if self.connection.port == 0 {
            return Err(ConfigError::Validation(
                "Connection port must be greater than 0".to_string(),
            ));
        }
        if self.connection.timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "Timeout must be at least 1 second".to_string(),
            ));
        }
        if self.device.model.trim().is_empty() {
            return Err(ConfigError::Validation("Device model cannot be empty".to_string()));
        }
        if !(1900..2100).contains(&self.device.rollover_year) {
            return Err(ConfigError::Validation(
                "Rollover year must be between 1900 and 2099".to_string(),
            ));
        }
        if self.device.copies < 1 {
            return Err(ConfigError::Validation("Copies must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "192.168.0.50".to_string(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            model: "TM-2000AF".to_string(),
            rollover_year: default_rollover_year(),
            copies: default_copies(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = DriverConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_host() {
        let mut config = DriverConfig::default();
        config.connection.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_port() {
        let mut config = DriverConfig::default();
        config.connection.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rollover_year_bounds() {
        let mut config = DriverConfig::default();

        config.device.rollover_year = 1899;
        assert!(config.validate().is_err());

        config.device.rollover_year = 2100;
        assert!(config.validate().is_err());

        config.device.rollover_year = 1997;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_model() {
        let mut config = DriverConfig::default();
        config.device.model = String::new();
        assert!(config.validate().is_err());
    }
}
