//! Fund catalog.
//!
//! Read-only view over a [`FundStore`] once seeded.

use std::collections::HashSet;
use std::sync::Arc;

use fondo_core::data::Fund;
use fondo_core::error::{ConfigError, FondoError, StorageError, SubscriptionError};
use fondo_core::traits::FundStore;
use fondo_core::types::FundId;
use tracing::{debug, info};

/// Lookup of the funds users can subscribe to.
#[derive(Clone)]
pub struct FundCatalog {
    store: Arc<dyn FundStore>,
}

impl std::fmt::Debug for FundCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundCatalog").finish_non_exhaustive()
    }
}

impl FundCatalog {
    /// Creates a catalog over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn FundStore>) -> Self {
        Self { store }
    }

    /// Seeds the store with `seed` unless it already holds funds.
    ///
    /// Returns true if the seed was inserted.
    ///
    /// # Errors
    ///
    /// Returns a config error when both the store and `seed` are empty, a
    /// validation error for an invalid fund, and a storage error for a
    /// repeated id or a failed insert. A rejected seed inserts nothing.
    pub async fn initialize(&self, seed: Vec<Fund>) -> Result<bool, FondoError> {
        if !self.store.is_empty().await? {
            debug!("Fund catalog already populated, skipping seed");
            return Ok(false);
        }
        if seed.is_empty() {
            return Err(ConfigError::invalid_value("ledger.funds", "catalog cannot be empty").into());
        }

        // a rejected seed must leave the store empty
        let mut ids = HashSet::with_capacity(seed.len());
        for fund in &seed {
            fund.validate()?;
            if !ids.insert(&fund.id) {
                return Err(StorageError::duplicate_key("funds", fund.id.as_str()).into());
            }
        }

        let count = seed.len();
        for fund in seed {
            self.store.insert(fund).await?;
        }
        info!(funds = count, "Fund catalog seeded");
        Ok(true)
    }

    /// Lists all funds in catalog order.
    pub async fn list_funds(&self) -> Result<Vec<Fund>, FondoError> {
        Ok(self.store.list().await?)
    }

    /// Looks up a fund by exact id.
    ///
    /// # Errors
    ///
    /// Returns `SubscriptionError::FundNotFound` for an unknown id.
    pub async fn get_fund(&self, fund_id: &FundId) -> Result<Fund, FondoError> {
        self.store
            .get(fund_id)
            .await?
            .ok_or_else(|| SubscriptionError::fund_not_found(fund_id.as_str()).into())
    }
}
