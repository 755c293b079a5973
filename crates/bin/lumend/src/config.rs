//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `lumen.toml` in the working directory, or at the path named by
//! `LUMEN_CONFIG`. Every section but `regions` has a sensible default.
//! Environment variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use lumen_adapter_limitless::DriverKind;
use lumen_app::ticker::RESYNC_INTERVAL;
use lumen_domain::config::RegionsConfig;

const DEFAULT_PATH: &str = "lumen.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Periodic resync settings.
    pub sync: SyncConfig,
    /// Bridges and their zones, keyed by region name.
    pub regions: RegionsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Seconds between two full resyncs.
    pub interval_secs: u64,
}

impl SyncConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Config {
    /// Load configuration from `lumen.toml` (or `$LUMEN_CONFIG`) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed, can't be read, or describes
    /// an unusable setup.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("LUMEN_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LUMEN_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("LUMEN_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("LUMEN_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("LUMEN_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.sync.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "sync interval must be non-zero".to_string(),
            ));
        }
        if self.regions.is_empty() {
            return Err(ConfigError::Validation(
                "at least one region must be configured".to_string(),
            ));
        }
        for (name, region) in &self.regions {
            region
                .configured_zones()
                .map_err(|err| ConfigError::Validation(format!("region {name:?}: {err}")))?;
            DriverKind::for_config(name, region)
                .map_err(|err| ConfigError::Validation(err.to_string()))?;
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4567,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "lumend=info,lumen=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: RESYNC_INTERVAL.as_secs(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
