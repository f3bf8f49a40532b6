//! API route definitions.

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;
use crate::handlers::{funds, health, notifications, transactions};
use crate::state::AppState;

/// Creates the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.config.cors);

    let api_routes = Router::new()
        // Fund routes; the static paths take precedence over `{id}`
        .route("/funds", get(funds::list_funds))
        .route("/funds/user", get(funds::user_funds))
        .route("/funds/subscribe", post(funds::subscribe))
        .route("/funds/unsubscribe", post(funds::unsubscribe))
        .route("/funds/{id}", get(funds::get_fund))
        // Transaction routes
        .route("/transactions", get(transactions::list_transactions))
        .route("/transactions/{id}", get(transactions::get_transaction))
        // Notification routes
        .route("/notifications", post(notifications::send_notification))
        .route("/notifications/send", post(notifications::send_notification));

    Router::new()
        .route("/", get(health::health_check))
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Builds the CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let mut cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age_secs));

    if origins.is_empty() {
        cors = cors.allow_origin(Any);
    } else {
        cors = cors.allow_origin(AllowOrigin::list(origins));
        // credentials cannot be combined with a wildcard origin
        if config.allow_credentials {
            cors = cors.allow_credentials(true);
        }
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;

    #[tokio::test]
    async fn test_create_router() {
        let _router = create_router(test_state().await);
    }

    #[test]
    fn test_build_cors_layer_variants() {
        let _disabled = build_cors_layer(&CorsConfig {
            enabled: false,
            ..Default::default()
        });
        let _explicit = build_cors_layer(&CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string(), "bad\norigin".to_string()],
            allow_credentials: true,
            ..Default::default()
        });
    }
}
