//! # Fondo API
//!
//! REST API for the Fondo fund subscription ledger.
//!
//! # Routes
//!
//! - `GET /` - Health check
//! - `GET /api/funds`, `GET /api/funds/{id}` - Fund catalog
//! - `GET /api/funds/user` - Balance and active subscriptions
//! - `POST /api/funds/subscribe`, `POST /api/funds/unsubscribe` - Subscription changes
//! - `GET /api/transactions`, `GET /api/transactions/{id}` - Ledger queries
//! - `POST /api/notifications` - Email/SMS about a fund
//!
//! User-scoped routes take an optional `user_id` query parameter and fall
//! back to the configured default user.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ApiConfig;
pub use error::ApiError;
pub use server::ApiServer;
pub use state::AppState;
