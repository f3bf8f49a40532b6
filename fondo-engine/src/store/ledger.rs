#![allow(clippy::disallowed_types)]

use std::collections::HashMap;

use async_trait::async_trait;
use fondo_core::data::TransactionRecord;
use fondo_core::error::StorageError;
use fondo_core::traits::TransactionLedger;
use fondo_core::types::{TransactionId, UserId};
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct LedgerInner {
    // position in this vector is the insertion sequence
    records: Vec<TransactionRecord>,
    by_id: HashMap<TransactionId, usize>,
    by_user: HashMap<UserId, Vec<usize>>,
}

/// Append-only ledger held in memory.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    inner: RwLock<LedgerInner>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Returns true if the ledger holds no record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TransactionLedger for InMemoryLedger {
    async fn append(&self, record: TransactionRecord) -> Result<TransactionRecord, StorageError> {
        let mut inner = self.inner.write();

        if let Some(&seq) = inner.by_id.get(&record.id) {
            let stored = &inner.records[seq];
            if stored == &record {
                return Ok(stored.clone());
            }
            return Err(StorageError::duplicate_key("ledger", record.id.to_string()));
        }

        let seq = inner.records.len();
        inner.by_id.insert(record.id, seq);
        inner
            .by_user
            .entry(record.user_id.clone())
            .or_default()
            .push(seq);
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TransactionRecord>, StorageError> {
        let inner = self.inner.read();
        let Some(seqs) = inner.by_user.get(user_id) else {
            return Ok(Vec::new());
        };

        let mut ordered: Vec<usize> = seqs.clone();
        ordered.sort_by(|a, b| {
            inner.records[*b]
                .timestamp
                .cmp(&inner.records[*a].timestamp)
                .then(b.cmp(a))
        });
        Ok(ordered
            .into_iter()
            .map(|seq| inner.records[seq].clone())
            .collect())
    }

    async fn get_by_id(
        &self,
        id: &TransactionId,
    ) -> Result<Option<TransactionRecord>, StorageError> {
        let inner = self.inner.read();
        Ok(inner.by_id.get(id).map(|&seq| inner.records[seq].clone()))
    }
}
