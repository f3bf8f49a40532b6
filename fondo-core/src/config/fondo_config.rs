//! Fondo service configuration structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::RetryConfig;
use super::traits::{Configurable, Validatable};
use super::validation::{EnvOverride, ValidationContext, Validator};
use crate::data::{Fund, default_catalog};
use crate::error::ConfigError;
use crate::types::{Amount, UserId};

/// Main service configuration.
///
/// # Example YAML
///
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8080
///
/// ledger:
///   initial_balance: 500000
///   default_user: default_user
///   max_conflict_retries: 3
///   retry:
///     initial_delay: 10ms
///     max_delay: 200ms
///
/// logging:
///   level: info
///   format: json
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FondoConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Ledger and engine configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Validatable for FondoConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let mut ctx = ValidationContext::new();

        ctx.enter("server");
        self.server.validate_with_context(&mut ctx);
        ctx.exit();

        ctx.enter("ledger");
        self.ledger.validate_with_context(&mut ctx);
        ctx.exit();

        ctx.enter("logging");
        self.logging.validate_with_context(&mut ctx);
        ctx.exit();

        ctx.into_result()
    }
}

impl Configurable for FondoConfig {
    /// Variables use the prefix and the section name, e.g.
    /// `FONDO_SERVER_PORT=9090` overrides `server.port` and
    /// `FONDO_LEDGER_INITIAL_BALANCE=100000` overrides `ledger.initial_balance`.
    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        self.server.apply_env_overrides(&format!("{prefix}_SERVER"))?;
        self.ledger.apply_env_overrides(&format!("{prefix}_LEDGER"))?;
        self.logging.apply_env_overrides(&format!("{prefix}_LOGGING"))
    }

    fn env_var_names(prefix: &str) -> Vec<String> {
        let mut names = Vec::new();
        for (section, fields) in [
            ("SERVER", &["HOST", "PORT", "REQUEST_TIMEOUT_MS"][..]),
            (
                "LEDGER",
                &["INITIAL_BALANCE", "DEFAULT_USER", "MAX_CONFLICT_RETRIES"][..],
            ),
            (
                "LOGGING",
                &["LEVEL", "FORMAT", "DIRECTORY", "STDOUT_ENABLED"][..],
            ),
        ] {
            names.extend(fields.iter().map(|f| format!("{prefix}_{section}_{f}")));
        }
        names
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_ms: default_request_timeout_ms(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Returns the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    fn validate_with_context(&self, ctx: &mut ValidationContext) {
        Validator::new(ctx)
            .require_non_empty("host", &self.host)
            .in_range("port", &self.port, &1, &65535)
            .positive("request_timeout_ms", &self.request_timeout_ms);
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        EnvOverride::apply_string(&format!("{prefix}_HOST"), &mut self.host);
        EnvOverride::apply_parsed(&format!("{prefix}_PORT"), &mut self.port)?;
        EnvOverride::apply_parsed(
            &format!("{prefix}_REQUEST_TIMEOUT_MS"),
            &mut self.request_timeout_ms,
        )
    }
}

/// Ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Balance of a newly created account.
    #[serde(default = "default_initial_balance")]
    pub initial_balance: u64,

    /// User assumed when a request names none.
    #[serde(default = "default_user")]
    pub default_user: String,

    /// Re-attempts after a lost optimistic-concurrency race.
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,

    /// Backoff between conflict retries and ledger append retries.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Custom seed catalog. The built-in catalog is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funds: Option<Vec<Fund>>,
}

fn default_initial_balance() -> u64 {
    500_000
}

fn default_user() -> String {
    "default_user".to_string()
}

fn default_max_conflict_retries() -> u32 {
    3
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
            default_user: default_user(),
            max_conflict_retries: default_max_conflict_retries(),
            retry: RetryConfig::default(),
            funds: None,
        }
    }
}

impl LedgerConfig {
    /// Returns the starting balance as an `Amount`.
    #[must_use]
    pub const fn initial_balance(&self) -> Amount {
        Amount::new(self.initial_balance)
    }

    /// Returns the default user id.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the configured user is blank.
    pub fn default_user_id(&self) -> Result<UserId, ConfigError> {
        UserId::new(self.default_user.clone())
            .map_err(|e| ConfigError::invalid_value("ledger.default_user", e.to_string()))
    }

    /// Returns the seed catalog: the configured funds or the built-in ones.
    #[must_use]
    pub fn seed_funds(&self) -> Vec<Fund> {
        self.funds.clone().unwrap_or_else(default_catalog)
    }

    fn validate_with_context(&self, ctx: &mut ValidationContext) {
        Validator::new(ctx)
            .positive("initial_balance", &self.initial_balance)
            .require_non_empty("default_user", &self.default_user)
            .in_range("max_conflict_retries", &self.max_conflict_retries, &0, &100);

        if let Some(funds) = &self.funds {
            let mut validator = Validator::new(ctx);
            validator.custom("funds", || !funds.is_empty(), "catalog cannot be empty");
            for fund in funds {
                if let Err(e) = fund.validate() {
                    ctx.add_error(ctx.invalid_value(&format!("funds.{}", fund.id), e.to_string()));
                }
            }
            let mut ids: Vec<&str> = funds.iter().map(|f| f.id.as_str()).collect();
            ids.sort_unstable();
            if ids.windows(2).any(|w| w[0] == w[1]) {
                ctx.add_error(ctx.invalid_value("funds", "fund ids must be unique"));
            }
        }

        ctx.enter("retry");
        self.retry.validate_with_context(ctx);
        ctx.exit();
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        EnvOverride::apply_parsed(
            &format!("{prefix}_INITIAL_BALANCE"),
            &mut self.initial_balance,
        )?;
        EnvOverride::apply_string(&format!("{prefix}_DEFAULT_USER"), &mut self.default_user);
        EnvOverride::apply_parsed(
            &format!("{prefix}_MAX_CONFLICT_RETRIES"),
            &mut self.max_conflict_retries,
        )
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty).
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files. No file output when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// File rotation (hourly, daily, never).
    #[serde(default = "default_rotation")]
    pub rotation: String,

    /// Whether to log to stdout.
    #[serde(default = "default_stdout_enabled")]
    pub stdout_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

fn default_stdout_enabled() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            directory: None,
            rotation: default_rotation(),
            stdout_enabled: default_stdout_enabled(),
        }
    }
}

impl LoggingConfig {
    fn validate_with_context(&self, ctx: &mut ValidationContext) {
        let level = self.level.to_lowercase();
        let format = self.format.to_lowercase();
        let rotation = self.rotation.to_lowercase();
        Validator::new(ctx)
            .custom(
                "level",
                || ["trace", "debug", "info", "warn", "error"].contains(&level.as_str()),
                "must be one of trace, debug, info, warn, error",
            )
            .custom(
                "format",
                || ["json", "pretty"].contains(&format.as_str()),
                "must be json or pretty",
            )
            .custom(
                "rotation",
                || ["hourly", "daily", "never"].contains(&rotation.as_str()),
                "must be hourly, daily or never",
            )
            .custom(
                "stdout_enabled",
                || self.stdout_enabled || self.directory.is_some(),
                "at least one log output is required",
            );
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        EnvOverride::apply_string(&format!("{prefix}_LEVEL"), &mut self.level);
        EnvOverride::apply_string(&format!("{prefix}_FORMAT"), &mut self.format);
        EnvOverride::apply_optional_string(&format!("{prefix}_DIRECTORY"), &mut self.directory);
        EnvOverride::apply_bool(
            &format!("{prefix}_STDOUT_ENABLED"),
            &mut self.stdout_enabled,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFormat, ConfigLoader};

    #[test]
    fn test_default_config() {
        let config = FondoConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ledger.initial_balance(), Amount::new(500_000));
        assert_eq!(config.ledger.default_user, "default_user");
        assert_eq!(config.ledger.max_conflict_retries, 3);
        assert_eq!(config.ledger.seed_funds().len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_yaml_with_custom_catalog() {
        let yaml = r#"
server:
  port: 9090
ledger:
  initial_balance: 100000
  funds:
    - id: "A"
      name: "ALPHA"
      min_amount: 40000
      category: FIC
"#;
        let config: FondoConfig = ConfigLoader::new()
            .load_str(yaml, ConfigFormat::Yaml)
            .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.ledger.initial_balance, 100_000);
        let funds = config.ledger.seed_funds();
        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].name, "ALPHA");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let mut config = FondoConfig::default();
        config.ledger.funds = Some(Vec::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("catalog cannot be empty"));
    }

    #[test]
    fn test_duplicate_fund_ids_rejected() {
        let mut config = FondoConfig::default();
        let mut funds = default_catalog();
        funds.push(funds[0].clone());
        config.ledger.funds = Some(funds);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_balance_rejected() {
        let mut config = FondoConfig::default();
        config.ledger.initial_balance = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ledger.initial_balance"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut config = FondoConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_needs_an_output() {
        let mut config = FondoConfig::default();
        config.logging.stdout_enabled = false;
        assert!(config.validate().is_err());
        config.logging.directory = Some("./logs".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_names() {
        let names = FondoConfig::env_var_names("FONDO");
        assert!(names.contains(&"FONDO_SERVER_PORT".to_string()));
        assert!(names.contains(&"FONDO_LEDGER_INITIAL_BALANCE".to_string()));
        assert!(names.contains(&"FONDO_LOGGING_LEVEL".to_string()));
    }
}
