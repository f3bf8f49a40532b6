//! Configuration loader supporting YAML, TOML and JSON formats.

use serde::de::DeserializeOwned;
use std::path::Path;

use super::traits::{Configurable, Validatable};
use crate::error::ConfigError;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml)
    #[default]
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

impl ConfigFormat {
    /// Detects the format from a file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "yaml" | "yml" => Some(Self::Yaml),
                "toml" => Some(Self::Toml),
                "json" => Some(Self::Json),
                _ => None,
            })
    }
}

/// Configuration loader.
///
/// Parses a file or string, then applies environment overrides (when a
/// prefix is set) and validation (unless disabled), in that order.
///
/// # Example
///
/// ```rust,ignore
/// use fondo_core::config::{ConfigLoader, FondoConfig};
///
/// let config: FondoConfig = ConfigLoader::new()
///     .with_env_prefix("FONDO")
///     .load_file("config/fondo.yaml")?;
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env_prefix: Option<String>,
    validate: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with validation enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env_prefix: None,
            validate: true,
        }
    }

    /// Sets the environment variable prefix for overrides (e.g. `FONDO`).
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Sets whether to validate the configuration after loading.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Returns the environment variable prefix, if set.
    #[must_use]
    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    /// Loads configuration from a file, detecting the format from its
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the extension is not
    /// recognized, the content cannot be parsed, an override is malformed
    /// or validation fails.
    pub fn load_file<T, P>(&self, path: P) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Configurable + Validatable,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::InvalidFormat {
            path: path.display().to_string(),
            reason: "Unrecognized file extension. Supported: .yaml, .yml, .toml, .json".to_string(),
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config = Self::parse(&content, format).map_err(|e| match e {
            ConfigError::InvalidFormat { reason, .. } => ConfigError::InvalidFormat {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        self.finish(config)
    }

    /// Loads configuration from a string with the specified format.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load_file`], minus file access.
    pub fn load_str<T>(&self, content: &str, format: ConfigFormat) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Configurable + Validatable,
    {
        let config = Self::parse(content, format)?;
        self.finish(config)
    }

    /// Builds the configuration from defaults plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is malformed or validation fails.
    pub fn load_defaults<T>(&self) -> Result<T, ConfigError>
    where
        T: Default + Configurable + Validatable,
    {
        self.finish(T::default())
    }

    fn parse<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> Result<T, ConfigError> {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidFormat {
                path: "<string>".to_string(),
                reason: format!("YAML parse error: {e}"),
            }),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| ConfigError::InvalidFormat {
                path: "<string>".to_string(),
                reason: format!("TOML parse error: {e}"),
            }),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| ConfigError::InvalidFormat {
                path: "<string>".to_string(),
                reason: format!("JSON parse error: {e}"),
            }),
        }
    }

    fn finish<T>(&self, mut config: T) -> Result<T, ConfigError>
    where
        T: Configurable + Validatable,
    {
        if let Some(prefix) = &self.env_prefix {
            config.apply_env_overrides(prefix)?;
        }
        if self.validate {
            config.validate()?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct PortConfig {
        port: u16,
    }

    impl Configurable for PortConfig {
        fn apply_env_overrides(&mut self, _prefix: &str) -> Result<(), ConfigError> {
            Ok(())
        }

        fn env_var_names(prefix: &str) -> Vec<String> {
            vec![format!("{prefix}_PORT")]
        }
    }

    impl Validatable for PortConfig {
        fn validate(&self) -> Result<(), ConfigError> {
            if self.port == 0 {
                return Err(ConfigError::invalid_value("port", "Port cannot be 0"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("fondo.yml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("fondo.TOML")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("fondo.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("fondo")), None);
    }

    #[test]
    fn test_load_each_format() {
        let loader = ConfigLoader::new();
        let yaml: PortConfig = loader.load_str("port: 8080", ConfigFormat::Yaml).unwrap();
        let toml: PortConfig = loader.load_str("port = 8081", ConfigFormat::Toml).unwrap();
        let json: PortConfig = loader
            .load_str(r#"{"port": 8082}"#, ConfigFormat::Json)
            .unwrap();
        assert_eq!((yaml.port, toml.port, json.port), (8080, 8081, 8082));
    }

    #[test]
    fn test_validation_runs_unless_disabled() {
        let loader = ConfigLoader::new();
        let result: Result<PortConfig, _> = loader.load_str("port: 0", ConfigFormat::Yaml);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        let unchecked: PortConfig = ConfigLoader::new()
            .with_validation(false)
            .load_str("port: 0", ConfigFormat::Yaml)
            .unwrap();
        assert_eq!(unchecked.port, 0);
    }

    #[test]
    fn test_invalid_yaml() {
        let result: Result<PortConfig, _> =
            ConfigLoader::new().load_str("port: [invalid", ConfigFormat::Yaml);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("YAML parse error"));
    }

    #[test]
    fn test_file_not_found() {
        let result: Result<PortConfig, _> =
            ConfigLoader::new().load_file("/nonexistent/path/fondo.yaml");
        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn test_load_file_reports_path() {
        let path = std::env::temp_dir().join("fondo_loader_bad.toml");
        std::fs::write(&path, "port = \"x\"").unwrap();

        let result: Result<PortConfig, _> = ConfigLoader::new().load_file(&path);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("fondo_loader_bad.toml"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_env_prefix() {
        let loader = ConfigLoader::new().with_env_prefix("FONDO");
        assert_eq!(loader.env_prefix(), Some("FONDO"));
        assert_eq!(PortConfig::env_var_names("FONDO"), ["FONDO_PORT"]);
    }
}
