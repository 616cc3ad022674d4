//! HTTP handlers for catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::catalog::{
    CatalogService, CreateClampingDeviceInput, CreateMeasuringEquipmentInput,
    CreateToolMasterInput,
};
use crate::AppState;
use shared::models::{ClampingDevice, MeasuringEquipment, ToolMaster};

/// Create a tool master record
pub async fn create_tool_master(
    State(state): State<AppState>,
    Json(input): Json<CreateToolMasterInput>,
) -> AppResult<Json<ToolMaster>> {
    let service = CatalogService::new(state.db);
    let tool = service.create_tool_master(input).await?;
    Ok(Json(tool))
}

/// Get a tool master record by id
pub async fn get_tool_master(
    State(state): State<AppState>,
    Path(tool_id): Path<Uuid>,
) -> AppResult<Json<ToolMaster>> {
    let service = CatalogService::new(state.db);
    let tool = service.get_tool_master(tool_id).await?;
    Ok(Json(tool))
}

/// List tool master records
pub async fn list_tool_masters(State(state): State<AppState>) -> AppResult<Json<Vec<ToolMaster>>> {
    let service = CatalogService::new(state.db);
    let tools = service.list_tool_masters().await?;
    Ok(Json(tools))
}

/// Create a measuring equipment record
pub async fn create_measuring_equipment(
    State(state): State<AppState>,
    Json(input): Json<CreateMeasuringEquipmentInput>,
) -> AppResult<Json<MeasuringEquipment>> {
    let service = CatalogService::new(state.db);
    let equipment = service.create_measuring_equipment(input).await?;
    Ok(Json(equipment))
}

/// Get a measuring equipment record by id
pub async fn get_measuring_equipment(
    State(state): State<AppState>,
    Path(equipment_id): Path<Uuid>,
) -> AppResult<Json<MeasuringEquipment>> {
    let service = CatalogService::new(state.db);
    let equipment = service.get_measuring_equipment(equipment_id).await?;
    Ok(Json(equipment))
}

/// List measuring equipment records
pub async fn list_measuring_equipment(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MeasuringEquipment>>> {
    let service = CatalogService::new(state.db);
    let equipment = service.list_measuring_equipment().await?;
    Ok(Json(equipment))
}

/// Create a clamping device record
pub async fn create_clamping_device(
    State(state): State<AppState>,
    Json(input): Json<CreateClampingDeviceInput>,
) -> AppResult<Json<ClampingDevice>> {
    let service = CatalogService::new(state.db);
    let device = service.create_clamping_device(input).await?;
    Ok(Json(device))
}

/// Get a clamping device record by id
pub async fn get_clamping_device(
    State(state): State<AppState>,
    Path(device_id): Path<Uuid>,
) -> AppResult<Json<ClampingDevice>> {
    let service = CatalogService::new(state.db);
    let device = service.get_clamping_device(device_id).await?;
    Ok(Json(device))
}

/// List clamping device records
pub async fn list_clamping_devices(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ClampingDevice>>> {
    let service = CatalogService::new(state.db);
    let devices = service.list_clamping_devices().await?;
    Ok(Json(devices))
}
