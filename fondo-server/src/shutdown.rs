//! Graceful shutdown handling.
//!
//! Provides shutdown coordination for the Fondo server, including signal
//! handling.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Where the server is in its shutdown sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShutdownPhase {
    /// Serving normally.
    Running,
    /// A signal or caller asked to stop; in-flight requests are draining.
    Initiated,
    /// Cleanup finished.
    Complete,
}

/// Shutdown controller for coordinating graceful shutdown.
///
/// Clones share one phase; every waiter observes the latest value, so
/// waiting after the fact returns immediately.
#[derive(Debug, Clone)]
pub struct ShutdownController {
    phase: Arc<watch::Sender<ShutdownPhase>>,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    /// Creates a controller in the `Running` phase.
    #[must_use]
    pub fn new() -> Self {
        let (phase, _) = watch::channel(ShutdownPhase::Running);
        Self {
            phase: Arc::new(phase),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> ShutdownPhase {
        *self.phase.borrow()
    }

    /// Moves from `Running` to `Initiated`. Later calls are ignored.
    pub fn initiate_shutdown(&self) {
        let initiated = self.phase.send_if_modified(|phase| {
            if *phase == ShutdownPhase::Running {
                *phase = ShutdownPhase::Initiated;
                true
            } else {
                false
            }
        });
        if initiated {
            info!("Shutdown initiated");
        }
    }

    /// Returns whether shutdown has been initiated.
    #[must_use]
    pub fn is_shutdown_initiated(&self) -> bool {
        self.phase() >= ShutdownPhase::Initiated
    }

    /// Completes once shutdown has been initiated.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.phase.subscribe();
        let _ = rx
            .wait_for(|phase| *phase >= ShutdownPhase::Initiated)
            .await;
    }

    /// Marks shutdown as complete.
    pub fn mark_complete(&self) {
        self.phase.send_replace(ShutdownPhase::Complete);
    }

    /// Waits up to `timeout` for [`ShutdownController::mark_complete`].
    ///
    /// Returns `false` if the timeout elapsed first.
    pub async fn wait_for_completion(&self, timeout: Duration) -> bool {
        let mut rx = self.phase.subscribe();
        let completed = rx.wait_for(|phase| *phase == ShutdownPhase::Complete);
        match tokio::time::timeout(timeout, completed).await {
            Ok(result) => result.is_ok(),
            Err(_) => {
                warn!(?timeout, "Shutdown completion timeout");
                false
            }
        }
    }
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, then initiates shutdown.
pub async fn setup_signal_handlers(controller: ShutdownController) {
    wait_for_signal().await;
    controller.initiate_shutdown();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!(error = %e, "SIGTERM handler unavailable, listening for Ctrl+C only");
            return wait_for_ctrl_c().await;
        }
    };

    tokio::select! {
        () = wait_for_ctrl_c() => {}
        _ = sigterm.recv() => {
            info!("Received SIGTERM");
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received SIGINT (Ctrl+C)"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_phases_advance_once() {
        let controller = ShutdownController::new();
        assert_eq!(controller.phase(), ShutdownPhase::Running);
        assert!(!controller.is_shutdown_initiated());

        controller.initiate_shutdown();
        controller.initiate_shutdown();
        assert_eq!(controller.phase(), ShutdownPhase::Initiated);

        controller.mark_complete();
        controller.initiate_shutdown();
        assert_eq!(controller.phase(), ShutdownPhase::Complete);
        assert!(controller.is_shutdown_initiated());
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_from_clone() {
        let controller = ShutdownController::new();

        let ctrl = controller.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            ctrl.initiate_shutdown();
        });

        let result =
            tokio::time::timeout(Duration::from_secs(1), controller.wait_for_shutdown()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_late_waiter_returns_immediately() {
        let controller = ShutdownController::new();
        controller.initiate_shutdown();

        let result =
            tokio::time::timeout(Duration::from_millis(100), controller.wait_for_shutdown()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_completion_and_timeout() {
        let controller = ShutdownController::new();
        controller.initiate_shutdown();
        assert!(
            !controller
                .wait_for_completion(Duration::from_millis(20))
                .await
        );

        controller.mark_complete();
        assert!(
            controller
                .wait_for_completion(Duration::from_millis(100))
                .await
        );
    }
}
