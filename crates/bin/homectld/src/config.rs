//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `homectl.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use homectl_domain::pin::PinAssignments;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// State-file storage settings.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Pin wiring.
    pub pins: PinsConfig,
    /// Background loop settings.
    pub scheduler: SchedulerConfig,
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

/// State directory configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the state files and the event log.
    pub dir: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Pin numbers for every actuated module. Defaults match the reference
/// wiring.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PinsConfig {
    pub light: u8,
    pub ac: u8,
    pub washing_machine: u8,
    pub laser: u8,
    pub sensor: u8,
    pub buzzer: u8,
}

impl PinsConfig {
    /// Convert into the domain's pin assignment table.
    #[must_use]
    pub fn assignments(&self) -> PinAssignments {
        PinAssignments {
            light: self.light,
            ac: self.ac,
            washing_machine: self.washing_machine,
            laser: self.laser,
            sensor: self.sensor,
            buzzer: self.buzzer,
        }
    }
}

/// Background loop timings, all in seconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Pause between scheduler passes.
    pub tick_secs: u64,
    /// Pause between notification delivery passes.
    pub delivery_secs: u64,
    /// Buzzer hold after a security alert.
    pub alert_hold_secs: u64,
}

impl Config {
    /// Load configuration from `homectl.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or a
    /// value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("homectl.toml")?;
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
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("HOMECTL_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("HOMECTL_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("HOMECTL_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = lookup("HOMECTL_STORAGE_DIR") {
            self.storage.dir = val;
        }
        if let Some(val) = lookup("HOMECTL_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.scheduler.tick_secs == 0 {
            return Err(ConfigError::Validation(
                "scheduler tick must be non-zero".to_string(),
            ));
        }
        if self.scheduler.delivery_secs == 0 {
            return Err(ConfigError::Validation(
                "delivery interval must be non-zero".to_string(),
            ));
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
            port: 7850,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: "state".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homectld=info,homectl=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for PinsConfig {
    fn default() -> Self {
        let pins = PinAssignments::default();
        Self {
            light: pins.light,
            ac: pins.ac,
            washing_machine: pins.washing_machine,
            laser: pins.laser,
            sensor: pins.sensor,
            buzzer: pins.buzzer,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_secs: 2,
            delivery_secs: 1,
            alert_hold_secs: 5,
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
