//! Transaction history handlers.

use axum::extract::{Path, Query, State};
use std::sync::Arc;

use fondo_core::data::TransactionRecord;
use fondo_core::error::{FondoError, SubscriptionError};
use fondo_core::types::TransactionId;

use crate::error::ApiResult;
use crate::handlers::funds::UserQuery;
use crate::response::ApiResponse;
use crate::state::AppState;

/// List the user's transactions, newest first.
///
/// GET /api/transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<ApiResponse<Vec<TransactionRecord>>> {
    let user_id = state.resolve_user(query.user_id.as_deref())?;
    let records = state.engine.transactions(&user_id).await?;
    Ok(ApiResponse::success(records))
}

/// Get one transaction.
///
/// GET /api/transactions/{id}
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<TransactionRecord>> {
    // a malformed id cannot name any record
    let transaction_id: TransactionId = id
        .parse()
        .map_err(|_| FondoError::from(SubscriptionError::transaction_not_found(id.as_str())))?;
    let record = state.engine.transaction(&transaction_id).await?;
    Ok(ApiResponse::success(record))
}
