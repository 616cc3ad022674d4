//! Catalog service for the inventory entities storage items reference
//!
//! Kept deliberately small: the crib needs to create, look up, and list
//! entities; detailed master data management lives elsewhere.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{ClampingDevice, MeasuringEquipment, ToolMaster};

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct ToolMasterRow {
    id: Uuid,
    tool_number: String,
    designation: String,
    manufacturer: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct MeasuringEquipmentRow {
    id: Uuid,
    inventory_number: String,
    designation: String,
    serial_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ClampingDeviceRow {
    id: Uuid,
    inventory_number: String,
    designation: String,
    clamping_range: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Input for creating a tool master record
#[derive(Debug, Deserialize)]
pub struct CreateToolMasterInput {
    pub tool_number: String,
    pub designation: String,
    pub manufacturer: Option<String>,
}

/// Input for creating a measuring equipment record
#[derive(Debug, Deserialize)]
pub struct CreateMeasuringEquipmentInput {
    pub inventory_number: String,
    pub designation: String,
    pub serial_number: Option<String>,
}

/// Input for creating a clamping device record
#[derive(Debug, Deserialize)]
pub struct CreateClampingDeviceInput {
    pub inventory_number: String,
    pub designation: String,
    pub clamping_range: Option<String>,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a tool master record
    pub async fn create_tool_master(&self, input: CreateToolMasterInput) -> AppResult<ToolMaster> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM tool_masters WHERE tool_number = $1)",
        )
        .bind(&input.tool_number)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("tool number".to_string()));
        }

        let row = sqlx::query_as::<_, ToolMasterRow>(
            r#"
            INSERT INTO tool_masters (tool_number, designation, manufacturer)
            VALUES ($1, $2, $3)
            RETURNING id, tool_number, designation, manufacturer, created_at, updated_at
            "#,
        )
        .bind(&input.tool_number)
        .bind(&input.designation)
        .bind(&input.manufacturer)
        .fetch_one(&self.db)
        .await?;

        Ok(ToolMaster {
            id: row.id,
            tool_number: row.tool_number,
            designation: row.designation,
            manufacturer: row.manufacturer,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Get a tool master record by id
    pub async fn get_tool_master(&self, tool_id: Uuid) -> AppResult<ToolMaster> {
        let row = sqlx::query_as::<_, ToolMasterRow>(
            r#"
            SELECT id, tool_number, designation, manufacturer, created_at, updated_at
            FROM tool_masters
            WHERE id = $1
            "#,
        )
        .bind(tool_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tool master".to_string()))?;

        Ok(ToolMaster {
            id: row.id,
            tool_number: row.tool_number,
            designation: row.designation,
            manufacturer: row.manufacturer,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// List tool master records
    pub async fn list_tool_masters(&self) -> AppResult<Vec<ToolMaster>> {
        let rows = sqlx::query_as::<_, ToolMasterRow>(
            r#"
            SELECT id, tool_number, designation, manufacturer, created_at, updated_at
            FROM tool_masters
            ORDER BY tool_number ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ToolMaster {
                id: row.id,
                tool_number: row.tool_number,
                designation: row.designation,
                manufacturer: row.manufacturer,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }

    /// Create a measuring equipment record
    pub async fn create_measuring_equipment(
        &self,
        input: CreateMeasuringEquipmentInput,
    ) -> AppResult<MeasuringEquipment> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM measuring_equipment WHERE inventory_number = $1)",
        )
        .bind(&input.inventory_number)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("inventory number".to_string()));
        }

        let row = sqlx::query_as::<_, MeasuringEquipmentRow>(
            r#"
            INSERT INTO measuring_equipment (inventory_number, designation, serial_number)
            VALUES ($1, $2, $3)
            RETURNING id, inventory_number, designation, serial_number, created_at, updated_at
            "#,
        )
        .bind(&input.inventory_number)
        .bind(&input.designation)
        .bind(&input.serial_number)
        .fetch_one(&self.db)
        .await?;

        Ok(MeasuringEquipment {
            id: row.id,
            inventory_number: row.inventory_number,
            designation: row.designation,
            serial_number: row.serial_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Get a measuring equipment record by id
    pub async fn get_measuring_equipment(&self, equipment_id: Uuid) -> AppResult<MeasuringEquipment> {
        let row = sqlx::query_as::<_, MeasuringEquipmentRow>(
            r#"
            SELECT id, inventory_number, designation, serial_number, created_at, updated_at
            FROM measuring_equipment
            WHERE id = $1
            "#,
        )
        .bind(equipment_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Measuring equipment".to_string()))?;

        Ok(MeasuringEquipment {
            id: row.id,
            inventory_number: row.inventory_number,
            designation: row.designation,
            serial_number: row.serial_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// List measuring equipment records
    pub async fn list_measuring_equipment(&self) -> AppResult<Vec<MeasuringEquipment>> {
        let rows = sqlx::query_as::<_, MeasuringEquipmentRow>(
            r#"
            SELECT id, inventory_number, designation, serial_number, created_at, updated_at
            FROM measuring_equipment
            ORDER BY inventory_number ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MeasuringEquipment {
                id: row.id,
                inventory_number: row.inventory_number,
                designation: row.designation,
                serial_number: row.serial_number,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }

    /// Create a clamping device record
    pub async fn create_clamping_device(
        &self,
        input: CreateClampingDeviceInput,
    ) -> AppResult<ClampingDevice> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM clamping_devices WHERE inventory_number = $1)",
        )
        .bind(&input.inventory_number)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("inventory number".to_string()));
        }

        let row = sqlx::query_as::<_, ClampingDeviceRow>(
            r#"
            INSERT INTO clamping_devices (inventory_number, designation, clamping_range)
            VALUES ($1, $2, $3)
            RETURNING id, inventory_number, designation, clamping_range, created_at, updated_at
            "#,
        )
        .bind(&input.inventory_number)
        .bind(&input.designation)
        .bind(&input.clamping_range)
        .fetch_one(&self.db)
        .await?;

        Ok(ClampingDevice {
            id: row.id,
            inventory_number: row.inventory_number,
            designation: row.designation,
            clamping_range: row.clamping_range,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Get a clamping device record by id
    pub async fn get_clamping_device(&self, device_id: Uuid) -> AppResult<ClampingDevice> {
        let row = sqlx::query_as::<_, ClampingDeviceRow>(
            r#"
            SELECT id, inventory_number, designation, clamping_range, created_at, updated_at
            FROM clamping_devices
            WHERE id = $1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Clamping device".to_string()))?;

        Ok(ClampingDevice {
            id: row.id,
            inventory_number: row.inventory_number,
            designation: row.designation,
            clamping_range: row.clamping_range,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// List clamping device records
    pub async fn list_clamping_devices(&self) -> AppResult<Vec<ClampingDevice>> {
        let rows = sqlx::query_as::<_, ClampingDeviceRow>(
            r#"
            SELECT id, inventory_number, designation, clamping_range, created_at, updated_at
            FROM clamping_devices
            ORDER BY inventory_number ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ClampingDevice {
                id: row.id,
                inventory_number: row.inventory_number,
                designation: row.designation,
                clamping_range: row.clamping_range,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }
}
