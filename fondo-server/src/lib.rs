//! # Fondo Server
//!
//! Service entry point for the Fondo fund subscription ledger.
//!
//! This crate provides:
//! - Configuration loading with environment overrides
//! - Logging initialization
//! - Engine, notifier and API wiring
//! - Graceful shutdown on SIGINT/SIGTERM

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod server;
pub mod shutdown;

pub use config::{ServiceConfig, ShutdownConfig};
pub use server::{FondoServer, ServerError, ServerState};
pub use shutdown::{ShutdownController, ShutdownPhase};
