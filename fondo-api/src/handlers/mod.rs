//! API request handlers.

pub mod funds;
pub mod health;
pub mod notifications;
pub mod transactions;
