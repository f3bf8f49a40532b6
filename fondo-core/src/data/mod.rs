//! Ledger data structures.
//!
//! # Structures
//!
//! - Fund - Catalog entry with minimum subscription amount
//! - FundCategory - FPV or FIC
//! - SubscriptionAccount - Per-user balance and active subscriptions
//! - Subscription - One active subscription
//! - TransactionRecord - Immutable ledger entry
//! - TransactionType - SUBSCRIPTION or CANCELLATION

mod account;
mod fund;
mod transaction;

pub use account::{Subscription, SubscriptionAccount};
pub use fund::{Fund, FundCategory, default_catalog};
pub use transaction::{TransactionRecord, TransactionType};
