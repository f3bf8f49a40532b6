//! Configuration management module.
//!
//! This module provides:
//! - YAML, TOML and JSON configuration file formats
//! - Configuration validation with path-qualified error messages
//! - Environment variable overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use fondo_core::config::{ConfigLoader, FondoConfig};
//!
//! let config: FondoConfig = ConfigLoader::new()
//!     .with_env_prefix("FONDO")
//!     .load_file("config/fondo.yaml")?;
//! ```

mod fondo_config;
mod loader;
mod retry;
mod traits;
pub mod validation;

pub use fondo_config::{FondoConfig, LedgerConfig, LoggingConfig, ServerConfig};
pub use loader::{ConfigFormat, ConfigLoader};
pub use retry::{BackoffStrategy, RetryConfig};
pub use traits::{Configurable, Validatable};
pub use validation::{EnvOverride, ValidationContext, ValidationResult, Validator};
