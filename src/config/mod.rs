//! Configuration module for the memprobe client
//!
//! Provides configuration loading, validation, and default settings for
//! the inspection-service endpoint and scan defaults.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{load_config, Config, ConfigLoader, LoggingConfig, ScanConfig, ServerConfig};
pub use validator::{validate_config, ConfigValidator};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
