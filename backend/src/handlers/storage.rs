//! HTTP handlers for storage item endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::storage::{
    CreateStorageItemInput, ListStorageItemsFilter, StorageItemService, StorageItemWithMetrics,
    UpdateStorageItemInput,
};
use crate::AppState;

/// Create a storage item with zero quantities
pub async fn create_storage_item(
    State(state): State<AppState>,
    Json(input): Json<CreateStorageItemInput>,
) -> AppResult<Json<StorageItemWithMetrics>> {
    let service = StorageItemService::new(state.db);
    let item = service.create_item(input).await?;
    Ok(Json(item))
}

/// Get a storage item with derived metrics
pub async fn get_storage_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<StorageItemWithMetrics>> {
    let service = StorageItemService::new(state.db);
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// List storage items, optionally filtered
pub async fn list_storage_items(
    State(state): State<AppState>,
    Query(filter): Query<ListStorageItemsFilter>,
) -> AppResult<Json<Vec<StorageItemWithMetrics>>> {
    let service = StorageItemService::new(state.db);
    let items = service.list_items(filter).await?;
    Ok(Json(items))
}

/// Update weights, thresholds, and notes of a storage item
pub async fn update_storage_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateStorageItemInput>,
) -> AppResult<Json<StorageItemWithMetrics>> {
    let service = StorageItemService::new(state.db);
    let item = service.update_item(item_id, input).await?;
    Ok(Json(item))
}

/// Soft-delete an empty storage item
pub async fn delete_storage_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = StorageItemService::new(state.db);
    service.delete_item(item_id).await?;
    Ok(Json(()))
}
