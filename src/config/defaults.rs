//! Default configuration values for the memprobe client

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub server: ServerDefaults,
    pub scan: ScanDefaults,
    pub logging: LoggingDefaults,
}

/// Default inspection-service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerDefaults {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

/// Default scan parameters for new sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanDefaults {
    pub align: u32,
    pub do_suspend: bool,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        server: ServerDefaults {
            host: "127.0.0.1".to_string(),
            port: 3030,
            timeout_secs: 30,
        },
        scan: ScanDefaults {
            align: 4,
            do_suspend: false,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = default_config();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3030);
        assert_eq!(config.server.timeout_secs, 30);
    }

    #[test]
    fn test_scan_defaults() {
        let config = default_config();
        assert_eq!(config.scan.align, 4);
        assert!(!config.scan.do_suspend);
    }

    #[test]
    fn test_serialization() {
        let config = default_config();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("host"));
        assert!(serialized.contains("port"));

        let deserialized: ConfigDefaults = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.server.host, config.server.host);
        assert_eq!(deserialized.scan.align, config.scan.align);
    }
}
