//! Catalog models for the inventory entities a storage item can hold

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Master record for a tool, insert, or accessory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMaster {
    pub id: Uuid,
    /// Shop-internal tool number (e.g., "T-4711")
    pub tool_number: String,
    pub designation: String,
    pub manufacturer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A serialized measuring instrument (caliper, micrometer, gauge)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasuringEquipment {
    pub id: Uuid,
    pub inventory_number: String,
    pub designation: String,
    pub serial_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A clamping device (vise, chuck, fixture)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClampingDevice {
    pub id: Uuid,
    pub inventory_number: String,
    pub designation: String,
    pub clamping_range: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
