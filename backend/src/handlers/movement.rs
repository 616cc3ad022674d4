//! HTTP handlers for movement ledger endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::movement::MovementService;
use crate::AppState;
use shared::models::StockMovement;
use shared::types::{PaginatedResponse, Pagination};

/// Get movements for a storage item, most recent first
pub async fn get_item_movements(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    pagination: Option<Query<Pagination>>,
) -> AppResult<Json<PaginatedResponse<StockMovement>>> {
    let pagination = pagination.map(|Query(p)| p).unwrap_or_default();
    let service = MovementService::new(state.db);
    let movements = service.get_movements(item_id, pagination).await?;
    Ok(Json(movements))
}

/// List all movements, most recent first
pub async fn list_movements(
    State(state): State<AppState>,
    pagination: Option<Query<Pagination>>,
) -> AppResult<Json<PaginatedResponse<StockMovement>>> {
    let pagination = pagination.map(|Query(p)| p).unwrap_or_default();
    let service = MovementService::new(state.db);
    let movements = service.list_movements(pagination).await?;
    Ok(Json(movements))
}
