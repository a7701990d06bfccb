//! Configuration validation

use super::loader::{Config, ConfigError};

/// Validates configuration values
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the full configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_server(config)?;
        Self::validate_scan(config)?;
        Self::validate_logging(config)?;
        Ok(())
    }

    fn validate_server(config: &Config) -> Result<(), ConfigError> {
        if config.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "server.host must not be empty".to_string(),
            ));
        }
        if config.server.port == 0 {
            return Err(ConfigError::Invalid(
                "server.port must be non-zero".to_string(),
            ));
        }
        if config.server.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.timeout_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_scan(config: &Config) -> Result<(), ConfigError> {
        if config.scan.align == 0 {
            return Err(ConfigError::Invalid(
                "scan.align must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_logging(config: &Config) -> Result<(), ConfigError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level '{}' is not one of {:?}",
                config.logging.level, LEVELS
            )));
        }
        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
