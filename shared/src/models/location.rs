//! Storage location and compartment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical storage location (cabinet, shelf unit, crib area)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageLocation {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single compartment within a storage location
///
/// The `code` is what gets printed on the compartment's QR label
/// (e.g., "A01-03") and is unique within its location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageCompartment {
    pub id: Uuid,
    pub location_id: Uuid,
    pub code: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
