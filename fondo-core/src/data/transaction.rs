//! Ledger records.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Fund, Subscription};
use crate::types::{Amount, FundId, Timestamp, TransactionId, UserId};

/// Kind of movement recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Balance debited into a fund
    Subscription,
    /// Committed amount credited back to the balance
    Cancellation,
}

impl TransactionType {
    /// Returns the wire name of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Subscription => "SUBSCRIPTION",
            Self::Cancellation => "CANCELLATION",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable ledger record of one committed balance change.
///
/// The fund name is a snapshot taken when the movement happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique record id.
    pub id: TransactionId,
    /// Account owner.
    pub user_id: UserId,
    /// Fund the movement refers to.
    pub fund_id: FundId,
    /// Fund name at the time of the movement.
    pub fund_name: String,
    /// Movement kind.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Amount moved, always positive.
    pub amount: Amount,
    /// Unix milliseconds.
    pub timestamp: Timestamp,
}

impl TransactionRecord {
    /// Builds the record for a subscription to `fund`.
    #[must_use]
    pub fn subscription(
        id: TransactionId,
        user_id: UserId,
        fund: &Fund,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            fund_id: fund.id.clone(),
            fund_name: fund.name.clone(),
            kind: TransactionType::Subscription,
            amount: fund.minimum_amount,
            timestamp,
        }
    }

    /// Builds the record for cancelling `subscription`.
    ///
    /// Uses the committed amount and name stored on the subscription, not
    /// the current catalog values.
    #[must_use]
    pub fn cancellation(
        id: TransactionId,
        user_id: UserId,
        subscription: &Subscription,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            fund_id: subscription.fund_id.clone(),
            fund_name: subscription.fund_name.clone(),
            kind: TransactionType::Cancellation,
            amount: subscription.amount_committed,
            timestamp,
        }
    }
}
