//! Error types and classification.
//!
//! # Error Hierarchy
//!
//! - FondoError - Top-level error type
//!   - SubscriptionError - Catalog lookups and business rule rejections
//!   - StorageError - Store failures
//!   - ConfigError - Configuration errors
//!   - ValidationError - Newtype construction failures
//!
//! Every error maps to an [`ErrorKind`], which is what the HTTP layer uses
//! to pick a status code.
//!
//! ```
//! use fondo_core::error::{ErrorKind, FondoError, SubscriptionError};
//!
//! let error = FondoError::from(SubscriptionError::fund_not_found("99"));
//! assert_eq!(error.kind(), ErrorKind::NotFound);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::types::ValidationError;

mod config;
mod storage;
mod subscription;

pub use config::ConfigError;
pub use storage::StorageError;
pub use subscription::SubscriptionError;

/// Coarse classification of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Requested fund or transaction does not exist.
    NotFound,
    /// Invalid input or a business rule rejection.
    Validation,
    /// Concurrent writers kept winning.
    Conflict,
    /// Backend failure or inconsistent stored state.
    Storage,
    /// Invalid configuration.
    Config,
}

impl ErrorKind {
    /// Returns the kind as a static string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Storage => "STORAGE",
            Self::Config => "CONFIG",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FondoError {
    /// Subscription error.
    #[error("{0}")]
    Subscription(#[from] SubscriptionError),

    /// Storage error.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Configuration error.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Invalid input.
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl FondoError {
    /// Classifies this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Subscription(e) if e.is_not_found() => ErrorKind::NotFound,
            Self::Subscription(e) if e.is_conflict() => ErrorKind::Conflict,
            Self::Subscription(SubscriptionError::BalanceOverflow { .. }) => ErrorKind::Storage,
            Self::Subscription(_) | Self::Validation(_) => ErrorKind::Validation,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns true if retrying the whole operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Subscription(e) => e.is_conflict(),
            Self::Storage(e) => e.is_retryable(),
            Self::Config(_) | Self::Validation(_) => false,
        }
    }

    /// Returns the inner subscription error, if this is one.
    #[must_use]
    pub fn as_subscription_error(&self) -> Option<&SubscriptionError> {
        match self {
            Self::Subscription(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the inner storage error, if this is one.
    #[must_use]
    pub fn as_storage_error(&self) -> Option<&StorageError> {
        match self {
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized Result type for ledger operations.
pub type Result<T> = std::result::Result<T, FondoError>;
