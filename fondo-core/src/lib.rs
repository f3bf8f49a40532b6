//! # Fondo Core
//!
//! Core types, traits, and interfaces for the Fondo fund subscription ledger.
//!
//! This crate provides:
//! - `NewType` wrappers for identifiers and amounts (`FundId`, `UserId`, `Amount`, ...)
//! - The data model (`Fund`, `SubscriptionAccount`, `TransactionRecord`)
//! - Error types and handling framework
//! - Storage traits implemented by the account store, ledger and fund store
//! - Configuration management with YAML/TOML/JSON support and environment variable overrides
//!
//! ```
//! use fondo_core::data::{Fund, FundCategory};
//! use fondo_core::types::{Amount, FundId};
//!
//! let fund = Fund::new(
//!     FundId::new("3").unwrap(),
//!     "DEUDAPRIVADA",
//!     Amount::new(50_000),
//!     FundCategory::Fic,
//! )
//! .unwrap();
//! assert_eq!(fund.minimum_amount.value(), 50_000);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]

/// Core type definitions and 'NewType' wrappers
pub mod types;

/// Funds, accounts and transaction records
pub mod data;

/// Error types and handling
pub mod error;

/// Storage trait definitions
pub mod traits;

/// Configuration management
pub mod config;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::data::*;
    pub use crate::error::*;
    pub use crate::traits::*;
    pub use crate::types::*;
}
