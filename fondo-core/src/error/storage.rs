//! Storage-related error types.
//!
//! This module provides error types for the fund, account and ledger
//! stores.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage error type covering missing keys, id collisions, backend
/// unavailability and inconsistent state.
///
/// # Examples
///
/// ```
/// use fondo_core::error::StorageError;
///
/// let error = StorageError::unavailable("ledger", "lock poisoned");
/// assert!(error.is_retryable());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageError {
    /// Key not found.
    #[error("[Storage] Not found in '{store}': {key}")]
    NotFound {
        /// Store that was queried.
        store: String,
        /// Missing key.
        key: String,
    },

    /// A different item already exists under the key.
    #[error("[Storage] Duplicate key in '{store}': {key}")]
    DuplicateKey {
        /// Store that rejected the write.
        store: String,
        /// Conflicting key.
        key: String,
    },

    /// Backend temporarily unavailable.
    #[error("[Storage] '{store}' unavailable: {reason}")]
    Unavailable {
        /// Unavailable store.
        store: String,
        /// Reason reported by the backend.
        reason: String,
    },

    /// Stored state violates an invariant.
    #[error("[Storage] Corrupted state in '{store}': {reason}")]
    Corrupted {
        /// Store holding the state.
        store: String,
        /// Description of the inconsistency.
        reason: String,
    },
}

impl StorageError {
    /// Returns true if retrying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(store: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            store: store.into(),
            key: key.into(),
        }
    }

    /// Creates a duplicate key error.
    #[must_use]
    pub fn duplicate_key(store: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            store: store.into(),
            key: key.into(),
        }
    }

    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(store: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            store: store.into(),
            reason: reason.into(),
        }
    }
}
