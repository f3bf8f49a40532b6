//! Main server implementation.
//!
//! Wires configuration, logging, the subscription engine, the notifier and
//! the HTTP API, and drives them through startup and shutdown.

use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use fondo_api::{ApiConfig, ApiServer, AppState};
use fondo_core::config::ConfigLoader;
use fondo_engine::{LogNotificationSender, Notifier, RetryPolicy, SubscriptionEngine};
use fondo_telemetry::logging::{LoggingError, init_logging};

use crate::config::ServiceConfig;
use crate::shutdown::{ShutdownController, setup_signal_handlers};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "FONDO";

/// Lifecycle state of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Not initialized, or fully stopped.
    Stopped,
    /// Components initialized, not yet serving.
    Starting,
    /// Serving requests.
    Running,
    /// Draining after a shutdown signal.
    ShuttingDown,
}

/// The Fondo server.
pub struct FondoServer {
    config: ServiceConfig,
    state: Arc<RwLock<ServerState>>,
    shutdown: ShutdownController,
    app: Option<Arc<AppState>>,
    _log_guards: Vec<WorkerGuard>,
}

impl std::fmt::Debug for FondoServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FondoServer")
            .field("config", &self.config)
            .field("initialized", &self.app.is_some())
            .finish_non_exhaustive()
    }
}

impl FondoServer {
    /// Creates a server for `config`. Nothing is started until
    /// [`FondoServer::initialize`].
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ServerState::Stopped)),
            shutdown: ShutdownController::new(),
            app: None,
            _log_guards: Vec::new(),
        }
    }

    /// Loads configuration from a YAML, TOML or JSON file, applies
    /// `FONDO_*` overrides and validates the result.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig, ServerError> {
        ConfigLoader::new()
            .with_env_prefix(ENV_PREFIX)
            .load_file(path)
            .map_err(|e| ServerError::ConfigError(e.to_string()))
    }

    /// Builds configuration from defaults plus `FONDO_*` overrides.
    pub fn default_config() -> Result<ServiceConfig, ServerError> {
        ConfigLoader::new()
            .with_env_prefix(ENV_PREFIX)
            .load_defaults()
            .map_err(|e| ServerError::ConfigError(e.to_string()))
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the current lifecycle state.
    pub async fn state(&self) -> ServerState {
        *self.state.read().await
    }

    /// Returns the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> &ShutdownController {
        &self.shutdown
    }

    /// Returns the API state once initialized.
    #[must_use]
    pub fn app_state(&self) -> Option<&Arc<AppState>> {
        self.app.as_ref()
    }

    /// Initializes logging, seeds the fund catalog and builds the API state.
    pub async fn initialize(&mut self) -> Result<(), ServerError> {
        {
            let mut state = self.state.write().await;
            if *state != ServerState::Stopped {
                return Err(ServerError::InvalidState(
                    "Server must be stopped to initialize".to_string(),
                ));
            }
            *state = ServerState::Starting;
        }

        self.init_logging()?;
        info!("Initializing Fondo server...");

        let ledger = &self.config.fondo.ledger;
        let default_user = ledger
            .default_user_id()
            .map_err(|e| ServerError::ConfigError(e.to_string()))?;

        let engine = SubscriptionEngine::in_memory(ledger)
            .await
            .map_err(|e| ServerError::InitializationError(format!("Failed to seed catalog: {e}")))?;
        let notifier = Notifier::new(
            Arc::new(LogNotificationSender::new()),
            RetryPolicy::new(ledger.retry.clone()),
        );

        let api_config = ApiConfig::from(&self.config.fondo.server);
        self.app = Some(Arc::new(AppState::new(
            api_config,
            Arc::new(engine),
            notifier,
            default_user,
        )));

        info!(
            initial_balance = ledger.initial_balance,
            default_user = %ledger.default_user,
            "Fondo server initialized"
        );
        Ok(())
    }

    fn init_logging(&mut self) -> Result<(), ServerError> {
        let log_config = self
            .config
            .log_config()
            .map_err(|e| ServerError::ConfigError(e.to_string()))?;

        match init_logging(&log_config) {
            Ok(guards) => {
                self._log_guards = guards;
                info!(level = %log_config.level, "Logging initialized");
                Ok(())
            }
            Err(LoggingError::AlreadyInitialized(reason)) => {
                warn!(%reason, "Keeping existing log subscriber");
                Ok(())
            }
            Err(e) => Err(ServerError::InitializationError(format!(
                "Failed to initialize logging: {e}"
            ))),
        }
    }

    /// Serves the API until shutdown is initiated, by signal or by
    /// [`FondoServer::shutdown`].
    pub async fn run(&self) -> Result<(), ServerError> {
        let app = {
            let mut state = self.state.write().await;
            let app = match (*state, &self.app) {
                (ServerState::Starting, Some(app)) => app.clone(),
                _ => {
                    return Err(ServerError::InvalidState(
                        "Server must be initialized before running".to_string(),
                    ));
                }
            };
            *state = ServerState::Running;
            app
        };

        let signal_ctrl = self.shutdown.clone();
        tokio::spawn(async move {
            setup_signal_handlers(signal_ctrl).await;
        });

        let shutdown = self.shutdown.clone();
        let shutdown_signal = async move {
            shutdown.wait_for_shutdown().await;
        };

        let drain_timeout = self.config.shutdown.timeout();
        let drain_deadline = {
            let shutdown = self.shutdown.clone();
            async move {
                shutdown.wait_for_shutdown().await;
                tokio::time::sleep(drain_timeout).await;
            }
        };

        info!(
            host = %self.config.fondo.server.host,
            port = self.config.fondo.server.port,
            "Fondo server running"
        );

        let serve = ApiServer::new(app).run_with_shutdown(shutdown_signal);
        tokio::select! {
            result = serve => {
                result.map_err(|e| ServerError::RuntimeError(format!("API server error: {e}")))?;
            }
            () = drain_deadline => {
                warn!(timeout = ?drain_timeout, "In-flight requests did not drain in time");
            }
        }

        self.graceful_shutdown().await;
        Ok(())
    }

    async fn graceful_shutdown(&self) {
        *self.state.write().await = ServerState::ShuttingDown;
        info!("Performing graceful shutdown...");

        if let Some(app) = &self.app {
            info!(
                delivered = app.notifier.delivered(),
                failed = app.notifier.failed(),
                "Notification totals"
            );
        }

        *self.state.write().await = ServerState::Stopped;
        self.shutdown.mark_complete();
        info!("Graceful shutdown complete");
    }

    /// Initiates shutdown.
    pub fn shutdown(&self) {
        self.shutdown.initiate_shutdown();
    }
}

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A component failed to start.
    #[error("Initialization error: {0}")]
    InitializationError(String),

    /// The requested transition is not valid in the current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The server failed while running.
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}
