//! Subscription engine.
//!
//! Every state change runs `VALIDATE -> APPLY -> RECORD`:
//!
//! - VALIDATE checks the fund and the account invariants; a rejection has
//!   no side effects.
//! - APPLY writes the next account state with a conditional update. A lost
//!   race re-reads and re-validates, up to `max_conflict_retries` times.
//! - RECORD appends the ledger record. The record is already stored on the
//!   account (`last_record`) by APPLY under a deterministic id, so a failed
//!   append is retried with backoff and, failing that, replayed the next
//!   time the user's account is read. Appends are idempotent by id, so a
//!   replay never produces a second record.

use std::sync::Arc;

use fondo_core::config::{LedgerConfig, RetryConfig};
use fondo_core::data::{Fund, SubscriptionAccount, TransactionRecord, TransactionType};
use fondo_core::error::{FondoError, StorageError, SubscriptionError};
use fondo_core::traits::{AccountStore, TransactionLedger, UpdateOutcome};
use fondo_core::types::{Amount, FundId, Timestamp, TransactionId, UserId};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::catalog::FundCatalog;
use crate::retry::RetryPolicy;
use crate::store::{InMemoryAccountStore, InMemoryFundStore, InMemoryLedger};

/// Engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Balance of a newly created account.
    pub initial_balance: Amount,
    /// Re-attempts after a lost optimistic-concurrency race.
    pub max_conflict_retries: u32,
    /// Backoff for conflict retries; `max_retries` bounds ledger append retries.
    pub retry: RetryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&LedgerConfig::default())
    }
}

impl From<&LedgerConfig> for EngineConfig {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            initial_balance: config.initial_balance(),
            max_conflict_retries: config.max_conflict_retries,
            retry: config.retry.clone(),
        }
    }
}

/// Outcome of a committed subscribe or unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReceipt {
    /// Id of the ledger record.
    pub transaction_id: TransactionId,
    /// Fund involved.
    pub fund_id: FundId,
    /// Fund name as recorded.
    pub fund_name: String,
    /// Movement kind.
    pub kind: TransactionType,
    /// Amount moved.
    pub amount: Amount,
    /// Free balance after the change.
    pub new_balance: Amount,
    /// Human-readable confirmation.
    pub message: String,
}

impl OperationReceipt {
    fn new(account: &SubscriptionAccount, record: &TransactionRecord) -> Self {
        let message = match record.kind {
            TransactionType::Subscription => format!("Subscribed to fund {}", record.fund_name),
            TransactionType::Cancellation => format!("Unsubscribed from fund {}", record.fund_name),
        };
        Self {
            transaction_id: record.id,
            fund_id: record.fund_id.clone(),
            fund_name: record.fund_name.clone(),
            kind: record.kind,
            amount: record.amount,
            new_balance: account.balance,
            message,
        }
    }
}

/// Orchestrates catalog lookups, account updates and ledger appends.
///
/// The engine is the only writer of accounts and of the ledger.
pub struct SubscriptionEngine {
    catalog: FundCatalog,
    accounts: Arc<dyn AccountStore>,
    ledger: Arc<dyn TransactionLedger>,
    config: EngineConfig,
    retry: RetryPolicy,
}

impl std::fmt::Debug for SubscriptionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SubscriptionEngine {
    /// Creates an engine over the given catalog and stores.
    #[must_use]
    pub fn new(
        catalog: FundCatalog,
        accounts: Arc<dyn AccountStore>,
        ledger: Arc<dyn TransactionLedger>,
        config: EngineConfig,
    ) -> Self {
        Self {
            retry: RetryPolicy::new(config.retry.clone()),
            catalog,
            accounts,
            ledger,
            config,
        }
    }

    /// Builds an engine on in-memory stores and seeds the catalog from
    /// `config`.
    pub async fn in_memory(config: &LedgerConfig) -> Result<Self, FondoError> {
        let catalog = FundCatalog::new(Arc::new(InMemoryFundStore::new()));
        catalog.initialize(config.seed_funds()).await?;
        Ok(Self::new(
            catalog,
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryLedger::new()),
            EngineConfig::from(config),
        ))
    }

    /// Returns the engine settings.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Subscribes `user_id` to `fund_id`, debiting the fund minimum.
    ///
    /// # Errors
    ///
    /// - `FundNotFound` for an unknown fund
    /// - `AlreadySubscribed` if the user already holds the fund
    /// - `InsufficientBalance` if the balance is below the minimum
    /// - `ConcurrencyConflict` if the retry bound is exhausted
    pub async fn subscribe(
        &self,
        user_id: &UserId,
        fund_id: &FundId,
    ) -> Result<OperationReceipt, FondoError> {
        let fund = match self.catalog.get_fund(fund_id).await {
            Ok(fund) => fund,
            Err(e) => {
                warn!(user_id = %user_id, fund_id = %fund_id, error = %e, "Subscription rejected");
                return Err(e);
            }
        };

        let account = self
            .apply(user_id, |current| current.subscribe(&fund, Timestamp::now()))
            .await?;
        let receipt = self.record(&account).await?;

        info!(
            user_id = %user_id,
            fund_id = %fund.id,
            amount = fund.minimum_amount.value(),
            balance = receipt.new_balance.value(),
            transaction_id = %receipt.transaction_id,
            "Subscribed to fund"
        );
        Ok(receipt)
    }

    /// Cancels the subscription of `user_id` to `fund_id`, crediting back
    /// exactly the committed amount.
    ///
    /// # Errors
    ///
    /// - `NotSubscribed` if there is no active subscription
    /// - `ConcurrencyConflict` if the retry bound is exhausted
    pub async fn unsubscribe(
        &self,
        user_id: &UserId,
        fund_id: &FundId,
    ) -> Result<OperationReceipt, FondoError> {
        let account = self
            .apply(user_id, |current| current.unsubscribe(fund_id, Timestamp::now()))
            .await?;
        let receipt = self.record(&account).await?;

        info!(
            user_id = %user_id,
            fund_id = %fund_id,
            amount = receipt.amount.value(),
            balance = receipt.new_balance.value(),
            transaction_id = %receipt.transaction_id,
            "Unsubscribed from fund"
        );
        Ok(receipt)
    }

    /// Returns the account of `user_id`, creating it on first access.
    pub async fn account(&self, user_id: &UserId) -> Result<SubscriptionAccount, FondoError> {
        self.load_account(user_id).await
    }

    /// Lists the transactions of `user_id`, newest first.
    pub async fn transactions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TransactionRecord>, FondoError> {
        if let Some(account) = self.accounts.get(user_id).await? {
            self.replay_outbox(&account).await?;
        }
        Ok(self.ledger.list_for_user(user_id).await?)
    }

    /// Looks up a transaction by id.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for an unknown id.
    pub async fn transaction(&self, id: &TransactionId) -> Result<TransactionRecord, FondoError> {
        self.ledger
            .get_by_id(id)
            .await?
            .ok_or_else(|| SubscriptionError::transaction_not_found(id.to_string()).into())
    }

    /// Lists all funds in catalog order.
    pub async fn list_funds(&self) -> Result<Vec<Fund>, FondoError> {
        self.catalog.list_funds().await
    }

    /// Looks up a fund by id.
    pub async fn get_fund(&self, fund_id: &FundId) -> Result<Fund, FondoError> {
        self.catalog.get_fund(fund_id).await
    }

    async fn load_account(&self, user_id: &UserId) -> Result<SubscriptionAccount, FondoError> {
        let account = self
            .accounts
            .get_or_create(user_id, self.config.initial_balance)
            .await?;
        self.replay_outbox(&account).await?;
        Ok(account)
    }

    // VALIDATE + APPLY with bounded optimistic retries.
    async fn apply<F>(
        &self,
        user_id: &UserId,
        transition: F,
    ) -> Result<SubscriptionAccount, FondoError>
    where
        F: Fn(&SubscriptionAccount) -> Result<SubscriptionAccount, SubscriptionError>,
    {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            let current = self.load_account(user_id).await?;

            let next = match transition(&current) {
                Ok(next) => next,
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Request rejected");
                    return Err(e.into());
                }
            };

            match self
                .accounts
                .compare_and_update(current.version, next)
                .await?
            {
                UpdateOutcome::Updated(account) => return Ok(account),
                UpdateOutcome::Conflict => {
                    let retries = attempts - 1;
                    if retries >= self.config.max_conflict_retries {
                        error!(user_id = %user_id, attempts, "Giving up after concurrent updates");
                        return Err(SubscriptionError::ConcurrencyConflict {
                            user_id: user_id.to_string(),
                            attempts,
                        }
                        .into());
                    }
                    warn!(
                        user_id = %user_id,
                        attempt = attempts,
                        "Account changed concurrently, retrying"
                    );
                    self.retry.wait(attempts).await;
                }
            }
        }
    }

    // RECORD: the committed state carries its record in the outbox.
    async fn record(&self, account: &SubscriptionAccount) -> Result<OperationReceipt, FondoError> {
        let record = account.last_record.as_ref().ok_or_else(|| StorageError::Corrupted {
            store: "accounts".to_string(),
            reason: format!(
                "committed version {} of {} has no outbox record",
                account.version, account.user_id
            ),
        })?;

        if let Err(e) = self.append_with_retry(record).await {
            // committed state stays authoritative; the outbox is replayed on next access
            error!(
                user_id = %account.user_id,
                transaction_id = %record.id,
                error = %e,
                "Ledger append failed, record left in outbox"
            );
        }
        Ok(OperationReceipt::new(account, record))
    }

    async fn replay_outbox(&self, account: &SubscriptionAccount) -> Result<(), FondoError> {
        let Some(record) = &account.last_record else {
            return Ok(());
        };
        if self.ledger.get_by_id(&record.id).await?.is_some() {
            return Ok(());
        }

        info!(
            user_id = %account.user_id,
            transaction_id = %record.id,
            "Replaying outbox record into ledger"
        );
        self.append_with_retry(record).await?;
        Ok(())
    }

    async fn append_with_retry(&self, record: &TransactionRecord) -> Result<(), StorageError> {
        let mut attempt: u32 = 0;
        loop {
            match self.ledger.append(record.clone()).await {
                Ok(_) => {
                    debug!(transaction_id = %record.id, "Ledger record appended");
                    return Ok(());
                }
                Err(e) if e.is_retryable() && self.retry.should_retry(attempt) => {
                    attempt += 1;
                    warn!(
                        transaction_id = %record.id,
                        attempt,
                        error = %e,
                        "Ledger append failed, retrying"
                    );
                    self.retry.wait(attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fondo_core::data::default_catalog;
    use fondo_core::error::ErrorKind;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn user() -> UserId {
        UserId::new("default_user").unwrap()
    }

    fn fund(id: &str) -> FundId {
        FundId::new(id).unwrap()
    }

    fn test_config() -> EngineConfig {
        EngineConfig {
            initial_balance: Amount::new(500_000),
            max_conflict_retries: 3,
            retry: RetryConfig {
                max_retries: 2,
                initial_delay: std::time::Duration::ZERO,
                max_delay: std::time::Duration::ZERO,
                backoff_strategy: fondo_core::config::BackoffStrategy::Fixed,
                jitter: false,
            },
        }
    }

    async fn engine_with(
        accounts: Arc<dyn AccountStore>,
        ledger: Arc<dyn TransactionLedger>,
    ) -> SubscriptionEngine {
        let catalog = FundCatalog::new(Arc::new(InMemoryFundStore::new()));
        catalog.initialize(default_catalog()).await.unwrap();
        SubscriptionEngine::new(catalog, accounts, ledger, test_config())
    }

    async fn engine() -> SubscriptionEngine {
        engine_with(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryLedger::new()),
        )
        .await
    }

    async fn assert_closed_ledger(engine: &SubscriptionEngine, user_id: &UserId) {
        let account = engine.account(user_id).await.unwrap();
        assert_eq!(account.total(), Some(Amount::new(500_000)));
    }

    #[tokio::test]
    async fn test_first_access_creates_account() {
        let engine = engine().await;
        let account = engine.account(&user()).await.unwrap();
        assert_eq!(account.balance, Amount::new(500_000));
        assert!(account.subscriptions.is_empty());
        assert!(engine.transactions(&user()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_debits_and_records() {
        let engine = engine().await;
        let receipt = engine.subscribe(&user(), &fund("1")).await.unwrap();

        assert_eq!(receipt.new_balance, Amount::new(425_000));
        assert_eq!(receipt.message, "Subscribed to fund FPV_EL CLIENTE_RECAUDADORA");

        let record = engine.transaction(&receipt.transaction_id).await.unwrap();
        assert_eq!(record.kind, TransactionType::Subscription);
        assert_eq!(record.amount, Amount::new(75_000));
        assert_closed_ledger(&engine, &user()).await;
    }

    #[tokio::test]
    async fn test_subscription_sequence_until_exhausted() {
        let engine = engine().await;
        let mut balances = Vec::new();
        for id in ["1", "2", "3", "4"] {
            let receipt = engine.subscribe(&user(), &fund(id)).await.unwrap();
            balances.push(receipt.new_balance.value());
        }
        assert_eq!(balances, [425_000, 300_000, 250_000, 0]);

        let err = engine.subscribe(&user(), &fund("5")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient balance to subscribe to fund FPV_EL CLIENTE_DINAMICA"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(engine.account(&user()).await.unwrap().balance, Amount::ZERO);
        assert_eq!(engine.transactions(&user()).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_subscribe_then_unsubscribe_restores_balance() {
        let engine = engine().await;
        engine.subscribe(&user(), &fund("1")).await.unwrap();
        let receipt = engine.unsubscribe(&user(), &fund("1")).await.unwrap();

        assert_eq!(receipt.new_balance, Amount::new(500_000));
        assert_eq!(receipt.message, "Unsubscribed from fund FPV_EL CLIENTE_RECAUDADORA");

        let kinds: Vec<TransactionType> = engine
            .transactions(&user())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.kind)
            .collect();
        assert_eq!(
            kinds,
            [TransactionType::Cancellation, TransactionType::Subscription]
        );
    }

    #[tokio::test]
    async fn test_duplicate_subscribe_has_no_effect() {
        let engine = engine().await;
        engine.subscribe(&user(), &fund("3")).await.unwrap();
        let err = engine.subscribe(&user(), &fund("3")).await.unwrap_err();

        assert!(matches!(
            err.as_subscription_error(),
            Some(SubscriptionError::AlreadySubscribed { .. })
        ));
        assert_eq!(
            engine.account(&user()).await.unwrap().balance,
            Amount::new(450_000)
        );
        assert_eq!(engine.transactions(&user()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_without_subscription() {
        let engine = engine().await;
        let err = engine.unsubscribe(&user(), &fund("2")).await.unwrap_err();
        assert_eq!(err.to_string(), "Not subscribed to fund 2");
        assert_eq!(
            engine.account(&user()).await.unwrap().balance,
            Amount::new(500_000)
        );
        assert!(engine.transactions(&user()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_fund_and_transaction() {
        let engine = engine().await;
        let err = engine.subscribe(&user(), &fund("99")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = engine
            .transaction(&TransactionId::generate())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().starts_with("Transaction not found: "));
    }

    #[tokio::test]
    async fn test_resubscribe_after_cancel_is_fresh() {
        let engine = engine().await;
        let first = engine.subscribe(&user(), &fund("4")).await.unwrap();
        engine.unsubscribe(&user(), &fund("4")).await.unwrap();
        let second = engine.subscribe(&user(), &fund("4")).await.unwrap();

        assert_ne!(first.transaction_id, second.transaction_id);
        assert_eq!(second.new_balance, Amount::new(250_000));
        assert_eq!(engine.transactions(&user()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let engine = engine().await;
        let alice = UserId::new("alice").unwrap();
        let bob = UserId::new("bob").unwrap();

        engine.subscribe(&alice, &fund("4")).await.unwrap();
        assert_eq!(
            engine.account(&bob).await.unwrap().balance,
            Amount::new(500_000)
        );
        assert!(engine.transactions(&bob).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_subscribes_never_overdraw() {
        let engine = Arc::new(engine().await);
        // 250000 + 125000 + 100000 + 75000 + 50000 = 600000 > 500000
        let mut handles = Vec::new();
        for id in ["4", "2", "5", "1", "3"] {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                engine.subscribe(&user(), &fund(id)).await
            }));
        }

        let mut committed = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                committed += 1;
            }
        }

        let account = engine.account(&user()).await.unwrap();
        assert_eq!(account.total(), Some(Amount::new(500_000)));
        assert_eq!(account.subscriptions.len(), committed);
        assert_eq!(engine.transactions(&user()).await.unwrap().len(), committed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_oversized_subscribes_one_wins() {
        let catalog = FundCatalog::new(Arc::new(InMemoryFundStore::new()));
        let big = |id: &str| {
            Fund::new(
                FundId::new(id).unwrap(),
                format!("BIG-{id}"),
                Amount::new(300_000),
                fondo_core::data::FundCategory::Fic,
            )
            .unwrap()
        };
        catalog.initialize(vec![big("A"), big("B")]).await.unwrap();
        let engine = Arc::new(SubscriptionEngine::new(
            catalog,
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryLedger::new()),
            EngineConfig {
                max_conflict_retries: 10,
                ..test_config()
            },
        ));

        let a = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.subscribe(&user(), &fund("A")).await })
        };
        let b = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.subscribe(&user(), &fund("B")).await })
        };
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let account = engine.account(&user()).await.unwrap();
        assert_eq!(account.balance, Amount::new(200_000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_round_trips_keep_ledger_closed() {
        let engine = Arc::new(engine().await);
        let mut handles = Vec::new();
        for _ in 0..8 {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                let _ = engine.subscribe(&user(), &fund("3")).await;
                let _ = engine.unsubscribe(&user(), &fund("3")).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_closed_ledger(&engine, &user()).await;
        let records = engine.transactions(&user()).await.unwrap();
        let debited: u64 = records
            .iter()
            .filter(|r| r.kind == TransactionType::Subscription)
            .map(|r| r.amount.value())
            .sum();
        let credited: u64 = records
            .iter()
            .filter(|r| r.kind == TransactionType::Cancellation)
            .map(|r| r.amount.value())
            .sum();
        let balance = engine.account(&user()).await.unwrap().balance.value();
        assert_eq!(500_000 - debited + credited, balance);
    }

    /// Account store whose conditional update always loses.
    struct AlwaysConflicting {
        inner: InMemoryAccountStore,
        attempts: AtomicU32,
    }

    #[async_trait]
    impl AccountStore for AlwaysConflicting {
        async fn get_or_create(
            &self,
            user_id: &UserId,
            initial_balance: Amount,
        ) -> Result<SubscriptionAccount, StorageError> {
            self.inner.get_or_create(user_id, initial_balance).await
        }

        async fn get(&self, user_id: &UserId) -> Result<Option<SubscriptionAccount>, StorageError> {
            self.inner.get(user_id).await
        }

        async fn compare_and_update(
            &self,
            _expected_version: u64,
            _new_state: SubscriptionAccount,
        ) -> Result<UpdateOutcome, StorageError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Ok(UpdateOutcome::Conflict)
        }
    }

    #[tokio::test]
    async fn test_conflict_retry_bound() {
        let accounts = Arc::new(AlwaysConflicting {
            inner: InMemoryAccountStore::new(),
            attempts: AtomicU32::new(0),
        });
        let engine = engine_with(accounts.clone(), Arc::new(InMemoryLedger::new())).await;

        let err = engine.subscribe(&user(), &fund("1")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.is_retryable());
        assert!(matches!(
            err.as_subscription_error(),
            Some(SubscriptionError::ConcurrencyConflict { attempts: 4, .. })
        ));
        assert_eq!(accounts.attempts.load(Ordering::SeqCst), 4);
        assert_eq!(
            engine.account(&user()).await.unwrap().balance,
            Amount::new(500_000)
        );
    }

    /// Ledger that reports itself unavailable for the first `failures` appends.
    struct FlakyLedger {
        inner: InMemoryLedger,
        failures: AtomicU32,
    }

    #[async_trait]
    impl TransactionLedger for FlakyLedger {
        async fn append(
            &self,
            record: TransactionRecord,
        ) -> Result<TransactionRecord, StorageError> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(StorageError::unavailable("ledger", "injected failure"));
            }
            self.inner.append(record).await
        }

        async fn list_for_user(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<TransactionRecord>, StorageError> {
            self.inner.list_for_user(user_id).await
        }

        async fn get_by_id(
            &self,
            id: &TransactionId,
        ) -> Result<Option<TransactionRecord>, StorageError> {
            self.inner.get_by_id(id).await
        }
    }

    #[tokio::test]
    async fn test_transient_append_failure_is_retried() {
        let ledger = Arc::new(FlakyLedger {
            inner: InMemoryLedger::new(),
            failures: AtomicU32::new(2),
        });
        let engine = engine_with(Arc::new(InMemoryAccountStore::new()), ledger.clone()).await;

        let receipt = engine.subscribe(&user(), &fund("1")).await.unwrap();
        assert!(ledger.inner.get_by_id(&receipt.transaction_id).await.unwrap().is_some());
        assert_eq!(ledger.inner.len(), 1);
    }

    #[tokio::test]
    async fn test_outbox_replayed_on_next_operation() {
        // three failures outlast the two append retries
        let ledger = Arc::new(FlakyLedger {
            inner: InMemoryLedger::new(),
            failures: AtomicU32::new(3),
        });
        let engine = engine_with(Arc::new(InMemoryAccountStore::new()), ledger.clone()).await;

        let receipt = engine.subscribe(&user(), &fund("2")).await.unwrap();
        assert_eq!(receipt.new_balance, Amount::new(375_000));
        assert!(ledger.inner.is_empty());

        let second = engine.subscribe(&user(), &fund("3")).await.unwrap();
        assert_eq!(second.new_balance, Amount::new(325_000));

        let records = engine.transactions(&user()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.id == receipt.transaction_id));
        assert_closed_ledger(&engine, &user()).await;
    }

    #[tokio::test]
    async fn test_outbox_replayed_by_transaction_listing() {
        let ledger = Arc::new(FlakyLedger {
            inner: InMemoryLedger::new(),
            failures: AtomicU32::new(3),
        });
        let engine = engine_with(Arc::new(InMemoryAccountStore::new()), ledger.clone()).await;

        let receipt = engine.subscribe(&user(), &fund("1")).await.unwrap();
        let records = engine.transactions(&user()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, receipt.transaction_id);

        // replaying again is a no-op
        engine.transactions(&user()).await.unwrap();
        assert_eq!(ledger.inner.len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_uses_configured_catalog() {
        let config = LedgerConfig {
            initial_balance: 10_000,
            funds: Some(vec![
                Fund::new(
                    FundId::new("X").unwrap(),
                    "SMALL",
                    Amount::new(10_000),
                    fondo_core::data::FundCategory::Fpv,
                )
                .unwrap(),
            ]),
            ..LedgerConfig::default()
        };
        let engine = SubscriptionEngine::in_memory(&config).await.unwrap();
        assert_eq!(engine.list_funds().await.unwrap().len(), 1);

        let receipt = engine.subscribe(&user(), &fund("X")).await.unwrap();
        assert_eq!(receipt.new_balance, Amount::ZERO);
    }
}
