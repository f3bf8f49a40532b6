//! # Fondo Engine
//!
//! Subscription ledger engine for the Fondo fund platform.
//!
//! This crate provides:
//! - The fund catalog ([`FundCatalog`])
//! - In-memory implementations of the account store, ledger and fund store
//! - The [`SubscriptionEngine`], the only writer of accounts and ledger
//! - Backoff for conflict and append retries ([`RetryPolicy`])
//! - Email/SMS notifications ([`notifier::Notifier`])
//!
//! # Operation flow
//!
//! ```text
//! subscribe / unsubscribe
//!        │
//!        ▼
//!   VALIDATE ── rejection ──▶ error, no side effects
//!        │
//!        ▼
//!     APPLY ──── conflict ──▶ re-read and re-validate (bounded)
//!        │
//!        ▼
//!    RECORD ──── failure ───▶ retried; replayed from the account outbox
//!        │
//!        ▼
//!    receipt
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)]
// Allow test-only issues
#![cfg_attr(test, allow(clippy::float_cmp))]
#![cfg_attr(test, allow(clippy::indexing_slicing))]

mod catalog;
mod engine;
pub mod notifier;
mod retry;
pub mod store;

pub use catalog::FundCatalog;
pub use engine::{EngineConfig, OperationReceipt, SubscriptionEngine};
pub use notifier::{
    LogNotificationSender, Notification, NotificationChannel, NotificationReceipt,
    NotificationSender, Notifier, NotifierError,
};
pub use retry::RetryPolicy;
pub use store::{InMemoryAccountStore, InMemoryFundStore, InMemoryLedger};
