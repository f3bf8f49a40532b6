//! API response types.
//!
//! Queries answer with the [`ApiResponse`] envelope; subscribe, unsubscribe
//! and notification requests answer with flat bodies carrying `success`.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use fondo_core::types::{Amount, TransactionId};
use fondo_engine::OperationReceipt;

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    /// Response status
    pub status: &'static str,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response with data.
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data: Some(data),
            message: None,
        }
    }

    /// Creates a successful response with data and message.
    #[must_use]
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success",
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Result of a subscribe or unsubscribe request.
#[derive(Debug, Serialize)]
pub struct OperationResponse {
    /// Always true; failures are error responses
    pub success: bool,
    /// Confirmation message
    pub message: String,
    /// Ledger record id
    pub transaction_id: TransactionId,
    /// Free balance after the change
    pub new_balance: Amount,
}

impl From<OperationReceipt> for OperationResponse {
    fn from(receipt: OperationReceipt) -> Self {
        Self {
            success: true,
            message: receipt.message,
            transaction_id: receipt.transaction_id,
            new_balance: receipt.new_balance,
        }
    }
}

impl IntoResponse for OperationResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
