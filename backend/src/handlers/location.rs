//! HTTP handlers for storage location and compartment endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::location::{
    CreateCompartmentInput, CreateLocationInput, LocationService, UpdateCompartmentInput,
    UpdateLocationInput,
};
use crate::AppState;
use shared::models::{StorageCompartment, StorageLocation};

/// Create a storage location
pub async fn create_location(
    State(state): State<AppState>,
    Json(input): Json<CreateLocationInput>,
) -> AppResult<Json<StorageLocation>> {
    let service = LocationService::new(state.db);
    let location = service.create_location(input).await?;
    Ok(Json(location))
}

/// List all storage locations
pub async fn list_locations(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StorageLocation>>> {
    let service = LocationService::new(state.db);
    let locations = service.list_locations().await?;
    Ok(Json(locations))
}

/// Get a storage location by id
pub async fn get_location(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
) -> AppResult<Json<StorageLocation>> {
    let service = LocationService::new(state.db);
    let location = service.get_location(location_id).await?;
    Ok(Json(location))
}

/// Update a storage location
pub async fn update_location(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(input): Json<UpdateLocationInput>,
) -> AppResult<Json<StorageLocation>> {
    let service = LocationService::new(state.db);
    let location = service.update_location(location_id, input).await?;
    Ok(Json(location))
}

/// Create a compartment within a location
pub async fn create_compartment(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(input): Json<CreateCompartmentInput>,
) -> AppResult<Json<StorageCompartment>> {
    let service = LocationService::new(state.db);
    let compartment = service.create_compartment(location_id, input).await?;
    Ok(Json(compartment))
}

/// List compartments of a location
pub async fn list_compartments(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
) -> AppResult<Json<Vec<StorageCompartment>>> {
    let service = LocationService::new(state.db);
    let compartments = service.list_compartments(location_id).await?;
    Ok(Json(compartments))
}

/// Get a compartment by id
pub async fn get_compartment(
    State(state): State<AppState>,
    Path(compartment_id): Path<Uuid>,
) -> AppResult<Json<StorageCompartment>> {
    let service = LocationService::new(state.db);
    let compartment = service.get_compartment(compartment_id).await?;
    Ok(Json(compartment))
}

/// Update a compartment
pub async fn update_compartment(
    State(state): State<AppState>,
    Path(compartment_id): Path<Uuid>,
    Json(input): Json<UpdateCompartmentInput>,
) -> AppResult<Json<StorageCompartment>> {
    let service = LocationService::new(state.db);
    let compartment = service.update_compartment(compartment_id, input).await?;
    Ok(Json(compartment))
}
