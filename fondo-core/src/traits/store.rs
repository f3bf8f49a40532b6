//! Persistence contracts.
//!
//! The engine only talks to storage through these traits:
//! - [`FundStore`] - Catalog entries, read-mostly
//! - [`AccountStore`] - Key-value store with conditional update
//! - [`TransactionLedger`] - Append-only log queryable by user
//!
//! # Example
//!
//! ```ignore
//! use fondo_core::traits::{AccountStore, UpdateOutcome};
//!
//! let current = store.get_or_create(&user_id, initial_balance).await?;
//! let next = current.subscribe(&fund, Timestamp::now())?;
//! match store.compare_and_update(current.version, next).await? {
//!     UpdateOutcome::Updated(account) => { /* committed */ }
//!     UpdateOutcome::Conflict => { /* re-read and retry */ }
//! }
//! ```

use async_trait::async_trait;

use crate::data::{Fund, SubscriptionAccount, TransactionRecord};
use crate::error::StorageError;
use crate::types::{Amount, FundId, TransactionId, UserId};

/// Result of a conditional account update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The write was applied; carries the stored state.
    Updated(SubscriptionAccount),
    /// The stored version did not match the expected one.
    Conflict,
}

impl UpdateOutcome {
    /// Returns true if the write was applied.
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Store of catalog funds.
#[async_trait]
pub trait FundStore: Send + Sync {
    /// Inserts a fund.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DuplicateKey` if the id is taken.
    async fn insert(&self, fund: Fund) -> Result<(), StorageError>;

    /// Looks up a fund by exact id.
    async fn get(&self, fund_id: &FundId) -> Result<Option<Fund>, StorageError>;

    /// Lists all funds in insertion order.
    async fn list(&self) -> Result<Vec<Fund>, StorageError>;

    /// Returns true if no fund has been stored yet.
    async fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.list().await?.is_empty())
    }
}

/// Store of subscription accounts with optimistic concurrency.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Returns the account of `user_id`, creating it with `initial_balance`
    /// and no subscriptions if it does not exist.
    async fn get_or_create(
        &self,
        user_id: &UserId,
        initial_balance: Amount,
    ) -> Result<SubscriptionAccount, StorageError>;

    /// Returns the account of `user_id`, if it exists.
    async fn get(&self, user_id: &UserId) -> Result<Option<SubscriptionAccount>, StorageError>;

    /// Replaces the account with `new_state` only if its stored version is
    /// `expected_version`. The stored version becomes `expected_version + 1`.
    ///
    /// A missing account is reported as a conflict.
    async fn compare_and_update(
        &self,
        expected_version: u64,
        new_state: SubscriptionAccount,
    ) -> Result<UpdateOutcome, StorageError>;
}

/// Append-only transaction log.
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Appends a record and returns the stored one.
    ///
    /// Idempotent by id: appending a record equal to the stored one is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DuplicateKey` if a different record is
    /// stored under the same id.
    async fn append(&self, record: TransactionRecord) -> Result<TransactionRecord, StorageError>;

    /// Lists the records of `user_id`, newest first. Records with equal
    /// timestamps come in reverse insertion order.
    async fn list_for_user(&self, user_id: &UserId)
    -> Result<Vec<TransactionRecord>, StorageError>;

    /// Looks up a record by id.
    async fn get_by_id(&self, id: &TransactionId)
    -> Result<Option<TransactionRecord>, StorageError>;
}
