//! Application state for the API server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fondo_core::types::UserId;
use fondo_engine::{Notifier, SubscriptionEngine};

use crate::config::ApiConfig;
use crate::error::ApiResult;

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// API configuration
    pub config: ApiConfig,
    /// Subscription engine
    pub engine: Arc<SubscriptionEngine>,
    /// Notification dispatcher
    pub notifier: Notifier,
    /// User assumed when a request names none
    default_user: UserId,
    started_at: Instant,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(
        config: ApiConfig,
        engine: Arc<SubscriptionEngine>,
        notifier: Notifier,
        default_user: UserId,
    ) -> Self {
        Self {
            config,
            engine,
            notifier,
            default_user,
            started_at: Instant::now(),
        }
    }

    /// Returns the default user.
    #[must_use]
    pub fn default_user(&self) -> &UserId {
        &self.default_user
    }

    /// Resolves the `user_id` query parameter, falling back to the default
    /// user when absent.
    pub fn resolve_user(&self, user_id: Option<&str>) -> ApiResult<UserId> {
        match user_id {
            None => Ok(self.default_user.clone()),
            Some(raw) => Ok(UserId::new(raw)?),
        }
    }

    /// Time since the state was created.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
