use async_trait::async_trait;
use fondo_core::data::Fund;
use fondo_core::error::StorageError;
use fondo_core::traits::FundStore;
use fondo_core::types::FundId;
use parking_lot::RwLock;

/// Fund store backed by a vector, preserving insertion order.
#[derive(Debug, Default)]
pub struct InMemoryFundStore {
    funds: RwLock<Vec<Fund>>,
}

impl InMemoryFundStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FundStore for InMemoryFundStore {
    async fn insert(&self, fund: Fund) -> Result<(), StorageError> {
        let mut funds = self.funds.write();
        if funds.iter().any(|f| f.id == fund.id) {
            return Err(StorageError::duplicate_key("funds", fund.id.as_str()));
        }
        funds.push(fund);
        Ok(())
    }

    async fn get(&self, fund_id: &FundId) -> Result<Option<Fund>, StorageError> {
        Ok(self.funds.read().iter().find(|f| &f.id == fund_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Fund>, StorageError> {
        Ok(self.funds.read().clone())
    }

    async fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.funds.read().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fondo_core::data::default_catalog;

    #[tokio::test]
    async fn test_insert_and_list_in_order() {
        let store = InMemoryFundStore::new();
        assert!(store.is_empty().await.unwrap());

        for fund in default_catalog().into_iter().rev() {
            store.insert(fund).await.unwrap();
        }
        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.id.to_string())
            .collect();
        assert_eq!(ids, ["5", "4", "3", "2", "1"]);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = InMemoryFundStore::new();
        let fund = default_catalog().remove(0);
        store.insert(fund.clone()).await.unwrap();
        let err = store.insert(fund).await.unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn test_get_is_exact_match() {
        let store = InMemoryFundStore::new();
        store.insert(default_catalog().remove(0)).await.unwrap();
        assert!(store.get(&FundId::new("1").unwrap()).await.unwrap().is_some());
        assert!(store.get(&FundId::new("01").unwrap()).await.unwrap().is_none());
    }
}
