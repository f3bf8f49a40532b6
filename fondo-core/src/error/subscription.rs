//! Subscription-related error types.
//!
//! Messages of these variants are shown to end users as-is.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Subscription error type covering catalog lookups, balance checks,
/// membership checks and write contention.
///
/// # Examples
///
/// ```
/// use fondo_core::error::SubscriptionError;
///
/// let error = SubscriptionError::NotSubscribed {
///     fund_id: "4".to_string(),
/// };
/// assert_eq!(error.to_string(), "Not subscribed to fund 4");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionError {
    /// Fund id not present in the catalog.
    #[error("Fund not found: {fund_id}")]
    FundNotFound {
        /// Requested fund id.
        fund_id: String,
    },

    /// Transaction id not present in the ledger.
    #[error("Transaction not found: {transaction_id}")]
    TransactionNotFound {
        /// Requested transaction id.
        transaction_id: String,
    },

    /// Free balance is below the fund minimum.
    #[error("Insufficient balance to subscribe to fund {fund_name}")]
    InsufficientBalance {
        /// Fund the user tried to subscribe to.
        fund_name: String,
        /// Fund minimum.
        required: u64,
        /// Free balance at validation time.
        available: u64,
    },

    /// User already holds an active subscription to the fund.
    #[error("Already subscribed to fund {fund_name}")]
    AlreadySubscribed {
        /// Fund id.
        fund_id: String,
        /// Fund name.
        fund_name: String,
    },

    /// User holds no active subscription to the fund.
    #[error("Not subscribed to fund {fund_id}")]
    NotSubscribed {
        /// Fund id.
        fund_id: String,
    },

    /// Account kept changing under concurrent writers.
    #[error("Concurrent update conflict for user {user_id} after {attempts} attempts")]
    ConcurrencyConflict {
        /// Account owner.
        user_id: String,
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// Crediting the balance would overflow.
    #[error("Balance overflow for user {user_id}")]
    BalanceOverflow {
        /// Account owner.
        user_id: String,
    },
}

impl SubscriptionError {
    /// Returns true if the error reports a missing fund or transaction.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FundNotFound { .. } | Self::TransactionNotFound { .. }
        )
    }

    /// Returns true if the request was rejected by a business rule.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InsufficientBalance { .. }
                | Self::AlreadySubscribed { .. }
                | Self::NotSubscribed { .. }
        )
    }

    /// Returns true if the error is caused by write contention.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }

    /// Creates a fund not found error.
    #[must_use]
    pub fn fund_not_found(fund_id: impl Into<String>) -> Self {
        Self::FundNotFound {
            fund_id: fund_id.into(),
        }
    }

    /// Creates a transaction not found error.
    #[must_use]
    pub fn transaction_not_found(transaction_id: impl Into<String>) -> Self {
        Self::TransactionNotFound {
            transaction_id: transaction_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            SubscriptionError::fund_not_found("99").to_string(),
            "Fund not found: 99"
        );
        assert_eq!(
            SubscriptionError::InsufficientBalance {
                fund_name: "FPV_EL CLIENTE_DINAMICA".to_string(),
                required: 100_000,
                available: 0,
            }
            .to_string(),
            "Insufficient balance to subscribe to fund FPV_EL CLIENTE_DINAMICA"
        );
        assert_eq!(
            SubscriptionError::AlreadySubscribed {
                fund_id: "1".to_string(),
                fund_name: "FPV_EL CLIENTE_RECAUDADORA".to_string(),
            }
            .to_string(),
            "Already subscribed to fund FPV_EL CLIENTE_RECAUDADORA"
        );
    }

    #[test]
    fn test_classification() {
        assert!(SubscriptionError::transaction_not_found("x").is_not_found());
        assert!(
            SubscriptionError::NotSubscribed {
                fund_id: "1".to_string()
            }
            .is_rejection()
        );
        let conflict = SubscriptionError::ConcurrencyConflict {
            user_id: "default_user".to_string(),
            attempts: 4,
        };
        assert!(conflict.is_conflict());
        assert!(!conflict.is_rejection());
        assert!(conflict.to_string().contains("4 attempts"));
    }
}
