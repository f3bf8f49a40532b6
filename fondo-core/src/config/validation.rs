//! Configuration validation utilities.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;

/// Result type for validation operations.
pub type ValidationResult = Result<(), ConfigError>;

/// Context for validation operations.
///
/// Tracks the current path in the configuration tree for better error messages.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    path: Vec<String>,
    errors: Vec<ConfigError>,
}

impl ValidationContext {
    /// Creates a new validation context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a new section in the configuration.
    pub fn enter(&mut self, section: impl Into<String>) {
        self.path.push(section.into());
    }

    /// Exits the current section.
    pub fn exit(&mut self) {
        self.path.pop();
    }

    /// Returns the current path as a dot-separated string.
    #[must_use]
    pub fn current_path(&self) -> String {
        self.path.join(".")
    }

    /// Adds a validation error.
    pub fn add_error(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    /// Returns true if there are no validation errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the collected validation errors.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Consumes the context.
    ///
    /// # Errors
    ///
    /// Returns the only collected error as is, or all of them wrapped in
    /// `ConfigError::Multiple`.
    pub fn into_result(mut self) -> ValidationResult {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ConfigError::Multiple {
                errors: self.errors,
            }),
        }
    }

    fn qualify(&self, field: &str) -> String {
        if self.path.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.current_path())
        }
    }

    /// Creates a missing field error qualified with the current path.
    #[must_use]
    pub fn missing_field(&self, field: &str) -> ConfigError {
        ConfigError::missing_field(self.qualify(field))
    }

    /// Creates an invalid value error qualified with the current path.
    #[must_use]
    pub fn invalid_value(&self, field: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::invalid_value(self.qualify(field), reason)
    }
}

/// Fluent validator collecting errors into a [`ValidationContext`].
#[derive(Debug)]
pub struct Validator<'a> {
    ctx: &'a mut ValidationContext,
}

impl<'a> Validator<'a> {
    /// Creates a new validator with the given context.
    pub fn new(ctx: &'a mut ValidationContext) -> Self {
        Self { ctx }
    }

    /// Validates that a string field is not blank.
    pub fn require_non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.ctx.add_error(self.ctx.missing_field(field));
        }
        self
    }

    /// Validates that a value is within an inclusive range.
    pub fn in_range<T: PartialOrd + Display>(
        &mut self,
        field: &str,
        value: &T,
        min: &T,
        max: &T,
    ) -> &mut Self {
        if value < min || value > max {
            self.ctx.add_error(self.ctx.invalid_value(
                field,
                format!("Value {value} must be between {min} and {max}"),
            ));
        }
        self
    }

    /// Validates that a value is strictly positive.
    pub fn positive<T: PartialOrd + Default + Display>(&mut self, field: &str, value: &T) -> &mut Self {
        if *value <= T::default() {
            self.ctx.add_error(
                self.ctx
                    .invalid_value(field, format!("Value {value} must be positive")),
            );
        }
        self
    }

    /// Validates using a custom predicate.
    pub fn custom<F>(&mut self, field: &str, predicate: F, error_msg: &str) -> &mut Self
    where
        F: FnOnce() -> bool,
    {
        if !predicate() {
            self.ctx.add_error(self.ctx.invalid_value(field, error_msg));
        }
        self
    }
}

/// Environment variable helper for applying overrides.
///
/// Unset variables leave the target untouched; set but malformed variables
/// are reported instead of being silently ignored.
///
/// # Example
///
/// ```rust
/// use fondo_core::config::EnvOverride;
///
/// let mut port: u16 = 8080;
/// EnvOverride::apply_parsed("FONDO_DOC_UNSET_PORT", &mut port).unwrap();
/// assert_eq!(port, 8080);
/// ```
pub struct EnvOverride;

impl EnvOverride {
    /// Applies an environment variable override to a string value.
    pub fn apply_string(var_name: &str, target: &mut String) {
        if let Ok(value) = std::env::var(var_name) {
            *target = value;
        }
    }

    /// Applies an environment variable override to an optional string value.
    pub fn apply_optional_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(value) = std::env::var(var_name) {
            *target = Some(value);
        }
    }

    /// Applies an environment variable override to any `FromStr` value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the variable is set but
    /// cannot be parsed.
    pub fn apply_parsed<T>(var_name: &str, target: &mut T) -> ValidationResult
    where
        T: FromStr,
        T::Err: Display,
    {
        if let Ok(value) = std::env::var(var_name) {
            *target = Self::parse(var_name, &value)?;
        }
        Ok(())
    }

    /// Applies an environment variable override to a boolean value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for values other than
    /// true/false, 1/0, yes/no or on/off.
    pub fn apply_bool(var_name: &str, target: &mut bool) -> ValidationResult {
        if let Ok(value) = std::env::var(var_name) {
            *target = match value.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnvVar {
                        name: var_name.to_string(),
                        reason: format!("'{value}' is not a boolean"),
                    });
                }
            };
        }
        Ok(())
    }

    fn parse<T>(var_name: &str, value: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar {
            name: var_name.to_string(),
            reason: e.to_string(),
        })
    }
}
