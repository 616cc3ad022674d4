//! HTTP handler for the public compartment lookup endpoint

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::services::lookup::{CompartmentView, LookupService};
use crate::AppState;

/// Resolve a scanned compartment code (public, for QR labels)
pub async fn lookup_compartment(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<CompartmentView>> {
    let service = LookupService::new(state.db);
    let view = service.lookup_compartment(&code).await?;
    Ok(Json(view))
}
