//! Fund catalog and subscription handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use fondo_core::data::{Fund, Subscription};
use fondo_core::types::{Amount, FundId, UserId};
use fondo_engine::notifier::validate_recipient;
use fondo_engine::{Notification, NotificationChannel};

use crate::error::ApiResult;
use crate::response::{ApiResponse, OperationResponse};
use crate::state::AppState;

/// Query naming the acting user.
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    /// User id; the default user when absent
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Notification requested together with a subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationPreference {
    /// Email address or phone number
    #[serde(alias = "contact_info")]
    pub recipient: String,
    /// Delivery channel
    pub notification_type: NotificationChannel,
}

/// Subscribe request body.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    /// Fund to subscribe to
    pub fund_id: String,
    /// Optional confirmation notification
    #[serde(default)]
    pub notification: Option<NotificationPreference>,
}

/// Unsubscribe request body.
#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    /// Fund to leave
    pub fund_id: String,
}

/// A user's balance and active subscriptions.
#[derive(Debug, Serialize)]
pub struct UserFundsResponse {
    /// User id
    pub user_id: UserId,
    /// Free balance
    pub balance: Amount,
    /// Active subscriptions, oldest first
    pub subscribed_funds: Vec<Subscription>,
}

/// List all funds.
///
/// GET /api/funds
pub async fn list_funds(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse<Vec<Fund>>> {
    let funds = state.engine.list_funds().await?;
    Ok(ApiResponse::success(funds))
}

/// Get one fund.
///
/// GET /api/funds/{id}
pub async fn get_fund(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Fund>> {
    let fund = state.engine.get_fund(&FundId::new(id)?).await?;
    Ok(ApiResponse::success(fund))
}

/// Get the user's balance and subscriptions.
///
/// GET /api/funds/user
pub async fn user_funds(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<ApiResponse<UserFundsResponse>> {
    let user_id = state.resolve_user(query.user_id.as_deref())?;
    let account = state.engine.account(&user_id).await?;

    Ok(ApiResponse::success(UserFundsResponse {
        user_id: account.user_id,
        balance: account.balance,
        subscribed_funds: account.subscriptions,
    }))
}

/// Subscribe to a fund.
///
/// POST /api/funds/subscribe
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
    Json(request): Json<SubscribeRequest>,
) -> ApiResult<OperationResponse> {
    let user_id = state.resolve_user(query.user_id.as_deref())?;
    let fund_id = FundId::new(request.fund_id)?;

    // everything the notification needs is resolved before the debit
    let notification = match request.notification {
        Some(pref) => {
            validate_recipient(pref.notification_type, &pref.recipient)?;
            let fund = state.engine.get_fund(&fund_id).await?;
            Some(Notification::for_fund(pref.recipient, pref.notification_type, &fund))
        }
        None => None,
    };

    let receipt = state.engine.subscribe(&user_id, &fund_id).await?;

    if let Some(notification) = notification {
        let channel = notification.channel;
        state.notifier.dispatch(notification);
        info!(
            user_id = %user_id,
            fund_id = %fund_id,
            channel = %channel,
            "Subscription notification dispatched"
        );
    }

    Ok(receipt.into())
}

/// Cancel a subscription.
///
/// POST /api/funds/unsubscribe
pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
    Json(request): Json<UnsubscribeRequest>,
) -> ApiResult<OperationResponse> {
    let user_id = state.resolve_user(query.user_id.as_deref())?;
    let fund_id = FundId::new(request.fund_id)?;

    let receipt = state.engine.unsubscribe(&user_id, &fund_id).await?;
    Ok(receipt.into())
}
