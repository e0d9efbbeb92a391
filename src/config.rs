//! Emulator configuration using Figment.
//!
//! Configuration is layered, later sources overriding earlier ones:
//! 1. built-in defaults
//! 2. a TOML file (optional; `config/emulator.toml` by default)
//! 3. environment variables prefixed with `SDG_EMU_`, nested with `__`
//!    (e.g. `SDG_EMU_SERVER__PORT=21112`)
//!
//! # Example
//! ```no_run
//! use sdg_emulator::config::EmulatorConfig;
//!
//! let config = EmulatorConfig::load()?;
//! println!("Emulating {} on port {}", config.instrument.model, config.server.port);
//! # Ok::<(), sdg_emulator::error::EmulatorError>(())
//! ```

use crate::error::{AppResult, EmulatorError};
use crate::function_generator::InstrumentModel;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/emulator.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SDG_EMU_";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmulatorConfig {
    #[serde(default)]
    pub application: ApplicationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub instrument: InstrumentConfig,
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_name")]
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

/// TCP listener configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Delay between bind attempts in milliseconds
    #[serde(default = "default_bind_retry_ms")]
    pub bind_retry_ms: u64,
    /// Longest accepted command line in bytes
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

/// Emulated instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Model identifier (e.g. "sdg1032x")
    #[serde(default = "default_model")]
    pub model: String,
}

// Default value functions
fn default_name() -> String {
    "sdg-emulator".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    21111
}

fn default_bind_retry_ms() -> u64 {
    1000
}

fn default_max_line_bytes() -> usize {
    4096
}

fn default_model() -> String {
    "sdg1032x".to_string()
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            bind_retry_ms: default_bind_retry_ms(),
            max_line_bytes: default_max_line_bytes(),
        }
    }
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| {
                EmulatorError::Configuration(format!(
                    "Invalid bind address '{}:{}': {}",
                    self.bind_address, self.port, e
                ))
            })
    }
}

impl EmulatorConfig {
    /// Load configuration from the default file (if present) and environment.
    pub fn load() -> AppResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path and environment.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let config: Self = Self::figment(path.as_ref()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The provider stack used by [`load_from`](Self::load_from).
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> AppResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.to_lowercase().as_str()) {
            return Err(EmulatorError::Configuration(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            )));
        }

        let valid_formats = ["pretty", "compact", "json"];
        if !valid_formats.contains(&self.application.log_format.to_lowercase().as_str()) {
            return Err(EmulatorError::Configuration(format!(
                "Invalid log_format '{}'. Must be one of: {}",
                self.application.log_format,
                valid_formats.join(", ")
            )));
        }

        if self.server.port == 0 {
            return Err(EmulatorError::Configuration(
                "Invalid port 0. Must be 1-65535".to_string(),
            ));
        }

        if self.server.max_line_bytes == 0 {
            return Err(EmulatorError::Configuration(
                "max_line_bytes must be greater than 0".to_string(),
            ));
        }

        self.server.socket_addr()?;
        self.instrument_model()?;

        Ok(())
    }

    /// The configured instrument model.
    pub fn instrument_model(&self) -> AppResult<InstrumentModel> {
        self.instrument.model.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EmulatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 21111);
        assert_eq!(config.instrument_model().unwrap(), InstrumentModel::Sdg1032x);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = EmulatorConfig::default();
        config.application.log_level = "chatty".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = EmulatorConfig::default();
        config.application.log_format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let mut config = EmulatorConfig::default();
        config.instrument.model = "ABC1000".to_string();
        assert!(matches!(
            config.validate(),
            Err(EmulatorError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let mut config = EmulatorConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_bind_address_is_rejected() {
        let mut config = EmulatorConfig::default();
        config.server.bind_address = "not an address".to_string();
        assert!(config.validate().is_err());
    }
}
