//! NewType wrappers for ledger primitives.
//!
//! This module provides type-safe wrappers so that fund ids, user ids
//! and transaction ids cannot be mixed up, and so that balances can
//! never go negative.
//!
//! # Types
//!
//! - [`FundId`] - Catalog fund identifiers
//! - [`UserId`] - Account owner identifiers
//! - [`TransactionId`] - Ledger record identifiers
//! - [`Amount`] - Non-negative integer currency units
//! - [`Timestamp`] - Unix millisecond timestamps

mod amount;
mod ids;
mod timestamp;

pub use amount::Amount;
pub use ids::{FundId, TransactionId, UserId};
pub use timestamp::Timestamp;

/// Validation error for `NewType` construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Fund ID is empty
    #[error("fund ID cannot be empty")]
    EmptyFundId,

    /// User ID is empty
    #[error("user ID cannot be empty")]
    EmptyUserId,

    /// Transaction ID is not a valid UUID
    #[error("invalid transaction ID: {0}")]
    InvalidTransactionId(String),

    /// Amount could not be parsed
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount must be strictly positive in this position
    #[error("amount must be positive")]
    ZeroAmount,

    /// Timestamp is invalid (negative)
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    /// Fund name is empty
    #[error("fund name cannot be empty")]
    EmptyFundName,
}
