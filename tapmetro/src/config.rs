//! tapmetro runtime configuration
//!
//! Combines the TOML bootstrap file with command-line overrides.
//! Command-line values win over the file, the file wins over compiled
//! defaults.

use std::net::{IpAddr, SocketAddr};

use tapmetro_common::config::{IndicatorConfig, InputConfig, PinConfig, TomlConfig};

use crate::error::{Error, Result};

/// Values supplied on the command line (or their environment variables)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub input: InputConfig,
    pub indicator: IndicatorConfig,
    pub pins: PinConfig,
    pub log_level: String,
}

impl Config {
    pub fn from_sources(toml: TomlConfig, overrides: ConfigOverrides) -> Result<Self> {
        let host = overrides.host.unwrap_or(toml.server.host);
        let port = overrides.port.unwrap_or(toml.server.port);
        let ip: IpAddr = host
            .parse()
            .map_err(|e| Error::Config(format!("Invalid host '{}': {}", host, e)))?;

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            input: toml.input,
            indicator: toml.indicator,
            pins: toml.pins,
            log_level: overrides.log_level.unwrap_or(toml.logging.level),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_bind_all_interfaces() {
        let config = Config::from_sources(TomlConfig::default(), ConfigOverrides::default()).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.input.debounce_ms, 200);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut toml = TomlConfig::default();
        toml.server.port = 9000;
        toml.logging.level = "warn".to_string();

        let config = Config::from_sources(
            toml,
            ConfigOverrides {
                host: Some("127.0.0.1".to_string()),
                port: Some(9100),
                log_level: Some("debug".to_string()),
            },
        )
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9100".parse().unwrap());
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_host_is_config_error() {
        let result = Config::from_sources(
            TomlConfig::default(),
            ConfigOverrides {
                host: Some("not-an-ip".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
