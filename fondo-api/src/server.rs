//! API server implementation.

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::middleware::RequestIdLayer;
use crate::routes::create_router;
use crate::state::AppState;

/// API server.
#[derive(Debug)]
pub struct ApiServer {
    /// Application state
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server over `state`.
    #[must_use]
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Builds the router with its middleware stack.
    pub fn app(&self) -> Router {
        create_router(self.state.clone())
            .layer(TimeoutLayer::new(self.state.config.request_timeout()))
            .layer(RequestIdLayer::new())
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the API server until `shutdown_signal` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or run.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ApiError> {
        let addr = self.state.config.bind_address();
        let app = self.app();

        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| ApiError::Internal(format!("Invalid bind address: {e}")))?;

        let listener = TcpListener::bind(socket_addr)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to bind to {addr}: {e}")))?;

        info!(address = %addr, "API server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::Internal(format!("Server error: {e}")))?;

        warn!("API server shut down");

        Ok(())
    }
}
