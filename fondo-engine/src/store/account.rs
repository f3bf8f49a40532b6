use async_trait::async_trait;
use dashmap::DashMap;
use fondo_core::data::SubscriptionAccount;
use fondo_core::error::StorageError;
use fondo_core::traits::{AccountStore, UpdateOutcome};
use fondo_core::types::{Amount, UserId};

/// Account store keyed by user.
///
/// Each conditional update holds the shard lock of its entry for the
/// version check and the write, so writers to the same user serialize
/// while different users never contend.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: DashMap<UserId, SubscriptionAccount>,
}

impl InMemoryAccountStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if no account exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get_or_create(
        &self,
        user_id: &UserId,
        initial_balance: Amount,
    ) -> Result<SubscriptionAccount, StorageError> {
        let entry = self
            .accounts
            .entry(user_id.clone())
            .or_insert_with(|| SubscriptionAccount::new(user_id.clone(), initial_balance));
        Ok(entry.value().clone())
    }

    async fn get(&self, user_id: &UserId) -> Result<Option<SubscriptionAccount>, StorageError> {
        Ok(self.accounts.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn compare_and_update(
        &self,
        expected_version: u64,
        mut new_state: SubscriptionAccount,
    ) -> Result<UpdateOutcome, StorageError> {
        let Some(mut entry) = self.accounts.get_mut(&new_state.user_id) else {
            return Ok(UpdateOutcome::Conflict);
        };
        if entry.version != expected_version {
            return Ok(UpdateOutcome::Conflict);
        }

        new_state.version = expected_version + 1;
        *entry = new_state.clone();
        Ok(UpdateOutcome::Updated(new_state))
    }
}
