//! Server configuration module.
//!
//! Wraps the service configuration with process-level settings and maps the
//! logging section onto the telemetry crate's [`LogConfig`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use fondo_core::config::{Configurable, EnvOverride, FondoConfig, LoggingConfig, Validatable};
use fondo_core::error::ConfigError;
use fondo_telemetry::logging::{LogConfig, LogFormat, LogOutput, RotationConfig};

/// Server configuration.
///
/// Contains all settings needed to start and run the Fondo server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// Base Fondo configuration.
    #[serde(flatten)]
    pub fondo: FondoConfig,

    /// Shutdown configuration.
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl ServiceConfig {
    /// Creates a new server configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the telemetry configuration for the logging section.
    pub fn log_config(&self) -> Result<LogConfig, ConfigError> {
        to_log_config(&self.fondo.logging)
    }
}

impl Validatable for ServiceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.fondo.validate()?;
        if self.shutdown.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "shutdown.timeout_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Configurable for ServiceConfig {
    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        self.fondo.apply_env_overrides(prefix)?;
        EnvOverride::apply_parsed(
            &format!("{prefix}_SHUTDOWN_TIMEOUT_SECS"),
            &mut self.shutdown.timeout_secs,
        )
    }

    fn env_var_names(prefix: &str) -> Vec<String> {
        let mut names = FondoConfig::env_var_names(prefix);
        names.push(format!("{prefix}_SHUTDOWN_TIMEOUT_SECS"));
        names
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// Time allowed for in-flight requests to drain, in seconds.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_shutdown_timeout_secs() -> u64 {
    30
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl ShutdownConfig {
    /// Returns the shutdown timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn to_log_config(logging: &LoggingConfig) -> Result<LogConfig, ConfigError> {
    let format = LogFormat::from_str(&logging.format)
        .map_err(|e| ConfigError::invalid_value("logging.format", e))?;
    let rotation = RotationConfig::from_str(&logging.rotation)
        .map_err(|e| ConfigError::invalid_value("logging.rotation", e))?;

    let mut outputs = Vec::new();
    if logging.stdout_enabled {
        outputs.push(LogOutput::Stdout);
    }
    if let Some(directory) = &logging.directory {
        outputs.push(LogOutput::File {
            path: directory.clone(),
            rotation: Some(rotation),
        });
    }

    Ok(LogConfig {
        level: logging.level.clone(),
        format,
        outputs,
        ..LogConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fondo_core::config::{ConfigFormat, ConfigLoader};

    #[test]
    fn test_shutdown_config_timeout() {
        let config = ShutdownConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_flattened_sections_load() {
        let yaml = r"
server:
  port: 9090
ledger:
  initial_balance: 100000
shutdown:
  timeout_secs: 5
";
        let config: ServiceConfig = ConfigLoader::new()
            .load_str(yaml, ConfigFormat::Yaml)
            .unwrap();

        assert_eq!(config.fondo.server.port, 9090);
        assert_eq!(config.fondo.ledger.initial_balance, 100_000);
        assert_eq!(config.shutdown.timeout_secs, 5);
    }

    #[test]
    fn test_zero_shutdown_timeout_rejected() {
        let mut config = ServiceConfig::default();
        config.shutdown.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_config_outputs() {
        let mut config = ServiceConfig::default();
        config.fondo.logging.format = "pretty".to_string();
        config.fondo.logging.rotation = "hourly".to_string();
        config.fondo.logging.directory = Some("/tmp/fondo-logs".to_string());

        let log = config.log_config().unwrap();
        assert_eq!(log.format, LogFormat::Pretty);
        assert_eq!(
            log.outputs,
            [
                LogOutput::Stdout,
                LogOutput::File {
                    path: "/tmp/fondo-logs".to_string(),
                    rotation: Some(RotationConfig::Hourly),
                },
            ]
        );
    }

    #[test]
    fn test_log_config_rejects_unknown_format() {
        let mut config = ServiceConfig::default();
        config.fondo.logging.format = "xml".to_string();
        assert!(config.log_config().is_err());
    }

    #[test]
    fn test_env_var_names_include_shutdown() {
        let names = ServiceConfig::env_var_names("FONDO");
        assert!(names.contains(&"FONDO_SERVER_PORT".to_string()));
        assert!(names.contains(&"FONDO_SHUTDOWN_TIMEOUT_SECS".to_string()));
    }
}
