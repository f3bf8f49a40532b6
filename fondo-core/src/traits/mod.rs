//! Core trait definitions.
//!
//! # Modules
//!
//! - store - Persistence contracts for funds, accounts and the ledger

mod store;

pub use store::{AccountStore, FundStore, TransactionLedger, UpdateOutcome};
