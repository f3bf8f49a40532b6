//! In-memory implementations of the persistence contracts.
//!
//! - [`InMemoryFundStore`] - Catalog entries in insertion order
//! - [`InMemoryAccountStore`] - Accounts keyed by user with per-entry locking
//! - [`InMemoryLedger`] - Append-only log with id and user indexes

mod account;
mod fund;
mod ledger;

pub use account::InMemoryAccountStore;
pub use fund::InMemoryFundStore;
pub use ledger::InMemoryLedger;
