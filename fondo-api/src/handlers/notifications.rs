//! Notification handler.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use fondo_core::types::FundId;
use fondo_engine::{Notification, NotificationChannel};

use crate::error::ApiResult;
use crate::state::AppState;

/// Notification request body.
#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    /// Email address or phone number
    #[serde(alias = "contact_info")]
    pub recipient: String,
    /// Fund the notification describes
    pub fund_id: String,
    /// Delivery channel
    pub notification_type: NotificationChannel,
}

/// Notification response body.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    /// Always true; failures are error responses
    pub success: bool,
    /// Confirmation message
    pub message: String,
    /// Id assigned by the sender
    pub message_id: String,
}

impl IntoResponse for NotificationResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Send a fund notification and wait for the sender.
///
/// POST /api/notifications, also served at /api/notifications/send
pub async fn send_notification(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NotificationRequest>,
) -> ApiResult<NotificationResponse> {
    let fund = state.engine.get_fund(&FundId::new(request.fund_id)?).await?;
    let notification = Notification::for_fund(request.recipient, request.notification_type, &fund);

    let receipt = state.notifier.send_now(&notification).await?;
    Ok(NotificationResponse {
        success: true,
        message: format!("Notification sent via {}", receipt.channel),
        message_id: receipt.message_id,
    })
}
