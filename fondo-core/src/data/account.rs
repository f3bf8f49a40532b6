//! Per-user subscription accounts.
//!
//! An account holds the free balance, the active subscriptions and a
//! version stamp used for optimistic concurrency. State transitions are
//! pure: [`SubscriptionAccount::subscribe`] and
//! [`SubscriptionAccount::unsubscribe`] validate against the current state
//! and return the next state, leaving `self` untouched. Persisting the
//! next state is the job of an
//! [`AccountStore`](crate::traits::AccountStore).

use serde::{Deserialize, Serialize};

use super::{Fund, TransactionRecord};
use crate::error::SubscriptionError;
use crate::types::{Amount, FundId, Timestamp, TransactionId, UserId};

/// An active subscription to one fund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscribed fund.
    pub fund_id: FundId,
    /// Fund name when subscribed.
    pub fund_name: String,
    /// Amount debited from the balance.
    pub amount_committed: Amount,
    /// When the subscription was made.
    pub subscribed_at: Timestamp,
}

/// Subscription account of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionAccount {
    /// Account owner.
    pub user_id: UserId,
    /// Free balance.
    pub balance: Amount,
    /// Active subscriptions, unique by fund, in subscription order.
    pub subscriptions: Vec<Subscription>,
    /// Number of committed updates.
    pub version: u64,
    /// Record produced by the most recent committed update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_record: Option<TransactionRecord>,
}

impl SubscriptionAccount {
    /// Creates a fresh account with no subscriptions.
    #[must_use]
    pub fn new(user_id: UserId, initial_balance: Amount) -> Self {
        Self {
            user_id,
            balance: initial_balance,
            subscriptions: Vec::new(),
            version: 0,
            last_record: None,
        }
    }

    /// Returns the active subscription to `fund_id`, if any.
    #[must_use]
    pub fn subscription(&self, fund_id: &FundId) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| &s.fund_id == fund_id)
    }

    /// Returns true if the user holds a subscription to `fund_id`.
    #[must_use]
    pub fn is_subscribed(&self, fund_id: &FundId) -> bool {
        self.subscription(fund_id).is_some()
    }

    /// Sum of the amounts committed to active subscriptions.
    #[must_use]
    pub fn committed(&self) -> Amount {
        self.subscriptions.iter().map(|s| s.amount_committed).sum()
    }

    /// Free balance plus committed amounts.
    ///
    /// Stays equal to the starting balance across every committed update.
    #[must_use]
    pub fn total(&self) -> Option<Amount> {
        self.balance.checked_add(self.committed())
    }

    /// Validates a subscription to `fund` and returns the next state.
    ///
    /// The next state carries the debited balance, the new subscription
    /// entry, the incremented version and the matching ledger record in
    /// `last_record`.
    ///
    /// # Errors
    ///
    /// - `SubscriptionError::AlreadySubscribed` if the user already holds the fund
    /// - `SubscriptionError::InsufficientBalance` if the balance is below the minimum
    pub fn subscribe(&self, fund: &Fund, now: Timestamp) -> Result<Self, SubscriptionError> {
        if self.is_subscribed(&fund.id) {
            return Err(SubscriptionError::AlreadySubscribed {
                fund_id: fund.id.to_string(),
                fund_name: fund.name.clone(),
            });
        }

        let balance = self.balance.checked_sub(fund.minimum_amount).ok_or_else(|| {
            SubscriptionError::InsufficientBalance {
                fund_name: fund.name.clone(),
                required: fund.minimum_amount.value(),
                available: self.balance.value(),
            }
        })?;

        let version = self.version + 1;
        let record = TransactionRecord::subscription(
            TransactionId::for_account_version(&self.user_id, version),
            self.user_id.clone(),
            fund,
            now,
        );

        let mut subscriptions = self.subscriptions.clone();
        subscriptions.push(Subscription {
            fund_id: fund.id.clone(),
            fund_name: fund.name.clone(),
            amount_committed: fund.minimum_amount,
            subscribed_at: now,
        });

        Ok(Self {
            user_id: self.user_id.clone(),
            balance,
            subscriptions,
            version,
            last_record: Some(record),
        })
    }

    /// Validates a cancellation of `fund_id` and returns the next state.
    ///
    /// Credits back exactly the committed amount.
    ///
    /// # Errors
    ///
    /// - `SubscriptionError::NotSubscribed` if there is no active subscription
    /// - `SubscriptionError::BalanceOverflow` if the credit cannot be represented
    pub fn unsubscribe(&self, fund_id: &FundId, now: Timestamp) -> Result<Self, SubscriptionError> {
        let position = self
            .subscriptions
            .iter()
            .position(|s| &s.fund_id == fund_id)
            .ok_or_else(|| SubscriptionError::NotSubscribed {
                fund_id: fund_id.to_string(),
            })?;

        let mut subscriptions = self.subscriptions.clone();
        let removed = subscriptions.remove(position);

        let balance = self
            .balance
            .checked_add(removed.amount_committed)
            .ok_or_else(|| SubscriptionError::BalanceOverflow {
                user_id: self.user_id.to_string(),
            })?;

        let version = self.version + 1;
        let record = TransactionRecord::cancellation(
            TransactionId::for_account_version(&self.user_id, version),
            self.user_id.clone(),
            &removed,
            now,
        );

        Ok(Self {
            user_id: self.user_id.clone(),
            balance,
            subscriptions,
            version,
            last_record: Some(record),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{TransactionType, default_catalog};

    fn account() -> SubscriptionAccount {
        SubscriptionAccount::new(UserId::new("default_user").unwrap(), Amount::new(500_000))
    }

    fn now() -> Timestamp {
        Timestamp::new(1_000).unwrap()
    }

    #[test]
    fn test_subscribe_debits_and_records() {
        let funds = default_catalog();
        let before = account();
        let after = before.subscribe(&funds[0], now()).unwrap();

        assert_eq!(after.balance, Amount::new(425_000));
        assert_eq!(after.version, 1);
        assert!(after.is_subscribed(&funds[0].id));
        assert_eq!(after.total(), Some(Amount::new(500_000)));

        let record = after.last_record.as_ref().unwrap();
        assert_eq!(record.kind, TransactionType::Subscription);
        assert_eq!(record.amount, Amount::new(75_000));
        assert_eq!(
            record.id,
            TransactionId::for_account_version(&before.user_id, 1)
        );

        // source state untouched
        assert_eq!(before.balance, Amount::new(500_000));
        assert_eq!(before.version, 0);
    }

    #[test]
    fn test_subscribe_twice_rejected() {
        let funds = default_catalog();
        let once = account().subscribe(&funds[2], now()).unwrap();
        let err = once.subscribe(&funds[2], now()).unwrap_err();
        assert!(matches!(err, SubscriptionError::AlreadySubscribed { .. }));
        assert_eq!(err.to_string(), "Already subscribed to fund DEUDAPRIVADA");
    }

    #[test]
    fn test_subscribe_insufficient_balance() {
        let funds = default_catalog();
        let poor = SubscriptionAccount::new(UserId::new("u").unwrap(), Amount::new(249_999));
        let err = poor.subscribe(&funds[3], now()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient balance to subscribe to fund FDO-ACCIONES"
        );
    }

    #[test]
    fn test_subscribe_exact_balance_reaches_zero() {
        let funds = default_catalog();
        let exact = SubscriptionAccount::new(UserId::new("u").unwrap(), Amount::new(250_000));
        let after = exact.subscribe(&funds[3], now()).unwrap();
        assert_eq!(after.balance, Amount::ZERO);
    }

    #[test]
    fn test_unsubscribe_round_trip() {
        let funds = default_catalog();
        let subscribed = account().subscribe(&funds[1], now()).unwrap();
        let back = subscribed.unsubscribe(&funds[1].id, now()).unwrap();

        assert_eq!(back.balance, Amount::new(500_000));
        assert!(back.subscriptions.is_empty());
        assert_eq!(back.version, 2);

        let record = back.last_record.unwrap();
        assert_eq!(record.kind, TransactionType::Cancellation);
        assert_eq!(record.amount, Amount::new(125_000));
    }

    #[test]
    fn test_unsubscribe_without_subscription() {
        let err = account()
            .unsubscribe(&FundId::new("4").unwrap(), now())
            .unwrap_err();
        assert_eq!(err.to_string(), "Not subscribed to fund 4");
    }
}
