//! Bootstrap configuration loading
//!
//! The TOML file is read once at startup. Resolution order for the file:
//! 1. Command-line argument (highest priority)
//! 2. `TAPMETRO_CONFIG` environment variable
//! 3. User config file (`~/.config/<app>/config.toml` on Linux)
//! 4. System config file (`/etc/<app>/config.toml`)
//!
//! A missing file is not fatal: a warning is logged and compiled defaults
//! are used. A file that exists but does not parse is a configuration error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "TAPMETRO_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub input: InputConfig,
    pub indicator: IndicatorConfig,
    pub pins: PinConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Button polling cadence
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Delay between two reads of the buttons
    pub poll_interval_ms: u64,
    /// Pause after a detected press before buttons are read again
    pub debounce_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
            debounce_ms: 200,
        }
    }
}

/// Tempo LED behaviour
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// How long the LED stays lit on each beat
    pub pulse_ms: u64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self { pulse_ms: 10 }
    }
}

/// Broadcom pin numbers of the panel wiring
///
/// Pin direction and pull-up setup belong to the GPIO driver; these values
/// are handed to it unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    pub learn: u8,
    pub tap: u8,
    pub tempo_led: u8,
    pub tap_led: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            learn: 23,
            tap: 24,
            tempo_led: 27,
            tap_led: 17,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Locates and loads the bootstrap TOML file for one application
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    app_name: String,
}

impl ConfigResolver {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
        }
    }

    /// Find the config file to use, if any
    ///
    /// Explicit paths (CLI, environment) are returned even when the file
    /// does not exist so the caller can report it.
    pub fn resolve_path(&self, cli_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = cli_path {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        let user_config = dirs::config_dir().map(|d| d.join(&self.app_name).join("config.toml"));
        if let Some(path) = user_config {
            if path.exists() {
                return Some(path);
            }
        }

        let system_config = PathBuf::from("/etc").join(&self.app_name).join("config.toml");
        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Resolve and load the configuration, falling back to defaults
    pub fn load(&self, cli_path: Option<&Path>) -> Result<TomlConfig> {
        match self.resolve_path(cli_path) {
            Some(path) if path.exists() => load_toml_config(&path),
            Some(path) => {
                warn!(
                    "Config file {} not found, using compiled defaults",
                    path.display()
                );
                Ok(TomlConfig::default())
            }
            None => {
                info!("No config file found, using compiled defaults");
                Ok(TomlConfig::default())
            }
        }
    }
}

/// Read and parse one TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}
