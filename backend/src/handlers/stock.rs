//! HTTP handlers for stock operation endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::stock::{
    AdjustStockInput, ReceiveStockInput, RemoveStockInput, StockOperationResponse, StockService,
    TransferResponse, TransferStockInput,
};
use crate::AppState;

/// Issue stock for use
pub async fn issue_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RemoveStockInput>,
) -> AppResult<Json<StockOperationResponse>> {
    let service = StockService::new(state.db);
    let response = service.issue(current_user.0.user_id, input).await?;
    Ok(Json(response))
}

/// Receive stock into storage, creating the storage item if needed
pub async fn receive_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ReceiveStockInput>,
) -> AppResult<Json<StockOperationResponse>> {
    let service = StockService::new(state.db);
    let response = service.receive(current_user.0.user_id, input).await?;
    Ok(Json(response))
}

/// Transfer stock to another compartment
pub async fn transfer_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<TransferStockInput>,
) -> AppResult<Json<TransferResponse>> {
    let service = StockService::new(state.db);
    let response = service.transfer(current_user.0.user_id, input).await?;
    Ok(Json(response))
}

/// Correct a condition bucket to an absolute value
pub async fn adjust_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<StockOperationResponse>> {
    let service = StockService::new(state.db);
    let response = service.adjust(current_user.0.user_id, input).await?;
    Ok(Json(response))
}

/// Scrap stock
pub async fn scrap_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RemoveStockInput>,
) -> AppResult<Json<StockOperationResponse>> {
    let service = StockService::new(state.db);
    let response = service.scrap(current_user.0.user_id, input).await?;
    Ok(Json(response))
}
