//! Configuration errors.
//!
//! Field names are dotted paths from the root of the configuration, e.g.
//! `ledger.initial_balance`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised while loading, overriding or validating configuration.
///
/// # Examples
///
/// ```
/// use fondo_core::error::ConfigError;
///
/// let error = ConfigError::missing_field("ledger.default_user");
/// assert_eq!(
///     error.to_string(),
///     "[Config] Missing value for 'ledger.default_user'"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    /// A required value is absent or blank.
    #[error("[Config] Missing value for '{field}'")]
    MissingField {
        /// Dotted path of the field.
        field: String,
    },

    /// A value is out of range or not one of the accepted options.
    #[error("[Config] Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted path of the field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("[Config] Cannot read '{path}': {reason}")]
    FileRead {
        /// File path.
        path: String,
        /// I/O error message.
        reason: String,
    },

    /// The file extension is unknown or the content does not parse.
    #[error("[Config] Cannot parse '{path}': {reason}")]
    InvalidFormat {
        /// File path, or `<string>` for in-memory content.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// A `FONDO_*` override is set to something unparsable.
    #[error("[Config] Environment variable {name}: {reason}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// Validation found several problems at once.
    #[error("[Config] {} problems: {}", .errors.len(), summarize(.errors))]
    Multiple {
        /// Individual problems, in the order they were found.
        errors: Vec<ConfigError>,
    },
}

fn summarize(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string().trim_start_matches("[Config] ").to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigError {
    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Dotted paths of the offending fields. Empty for file and
    /// environment errors.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::MissingField { field } | Self::InvalidValue { field, .. } => vec![field.as_str()],
            Self::Multiple { errors } => errors.iter().flat_map(Self::fields).collect(),
            Self::FileRead { .. } | Self::InvalidFormat { .. } | Self::InvalidEnvVar { .. } => {
                Vec::new()
            }
        }
    }
}
