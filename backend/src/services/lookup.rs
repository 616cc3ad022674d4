//! Compartment lookup service for public QR code scans
//!
//! Resolves the code printed on a compartment label to the compartment,
//! its location, and the stock it currently holds. QR image generation
//! happens on the label printer side; this is only the landing data.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::storage::{StorageItemRow, StorageItemWithMetrics, STORAGE_ITEM_COLUMNS};
use shared::models::{ItemType, StorageCompartment, StorageLocation};

/// Lookup service for QR code scans
#[derive(Clone)]
pub struct LookupService {
    db: PgPool,
}

/// Everything a scan of a compartment label resolves to
#[derive(Debug, Serialize)]
pub struct CompartmentView {
    pub compartment: StorageCompartment,
    pub location: StorageLocation,
    pub items: Vec<LookupItem>,
}

/// A storage item in the lookup view, with catalog display data
#[derive(Debug, Serialize)]
pub struct LookupItem {
    #[serde(flatten)]
    pub item: StorageItemWithMetrics,
    pub designation: Option<String>,
    pub entity_number: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct CompartmentWithLocationRow {
    compartment_id: Uuid,
    location_id: Uuid,
    code: String,
    compartment_name: Option<String>,
    compartment_active: bool,
    compartment_created_at: chrono::DateTime<chrono::Utc>,
    compartment_updated_at: chrono::DateTime<chrono::Utc>,
    location_name: String,
    location_description: Option<String>,
    location_active: bool,
    location_created_at: chrono::DateTime<chrono::Utc>,
    location_updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct EntityDisplayRow {
    designation: String,
    entity_number: String,
}

impl LookupService {
    /// Create a new LookupService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Resolve a compartment code scanned from a QR label
    pub async fn lookup_compartment(&self, code: &str) -> AppResult<CompartmentView> {
        let rows = sqlx::query_as::<_, CompartmentWithLocationRow>(
            r#"
            SELECT c.id as compartment_id, c.location_id, c.code,
                   c.name as compartment_name, c.is_active as compartment_active,
                   c.created_at as compartment_created_at, c.updated_at as compartment_updated_at,
                   l.name as location_name, l.description as location_description,
                   l.is_active as location_active,
                   l.created_at as location_created_at, l.updated_at as location_updated_at
            FROM storage_compartments c
            JOIN storage_locations l ON l.id = c.location_id
            WHERE c.code = $1
            "#,
        )
        .bind(code)
        .fetch_all(&self.db)
        .await?;

        if rows.len() > 1 {
            return Err(AppError::Validation {
                field: "code".to_string(),
                message: format!("Compartment code '{}' exists in multiple locations", code),
                message_de: format!("Fachcode '{}' existiert in mehreren Lagerorten", code),
            });
        }
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Compartment".to_string()))?;

        let item_rows = sqlx::query_as::<_, StorageItemRow>(&format!(
            "SELECT {} FROM storage_items \
             WHERE compartment_id = $1 AND deleted_at IS NULL ORDER BY created_at ASC",
            STORAGE_ITEM_COLUMNS
        ))
        .bind(row.compartment_id)
        .fetch_all(&self.db)
        .await?;

        let mut items = Vec::with_capacity(item_rows.len());
        for item_row in item_rows {
            let item = item_row.into_model()?;
            let display = self.entity_display(&item.item_type, item.entity_id()).await?;
            items.push(LookupItem {
                item: StorageItemWithMetrics::new(item),
                designation: display.as_ref().map(|d| d.designation.clone()),
                entity_number: display.map(|d| d.entity_number),
            });
        }

        Ok(CompartmentView {
            compartment: StorageCompartment {
                id: row.compartment_id,
                location_id: row.location_id,
                code: row.code,
                name: row.compartment_name,
                is_active: row.compartment_active,
                created_at: row.compartment_created_at,
                updated_at: row.compartment_updated_at,
            },
            location: StorageLocation {
                id: row.location_id,
                name: row.location_name,
                description: row.location_description,
                is_active: row.location_active,
                created_at: row.location_created_at,
                updated_at: row.location_updated_at,
            },
            items,
        })
    }

    async fn entity_display(
        &self,
        item_type: &ItemType,
        entity_id: Option<Uuid>,
    ) -> AppResult<Option<EntityDisplayRow>> {
        let Some(entity_id) = entity_id else {
            return Ok(None);
        };

        let query = match item_type {
            ItemType::Tool | ItemType::Insert | ItemType::Accessory => {
                "SELECT designation, tool_number as entity_number FROM tool_masters WHERE id = $1"
            }
            ItemType::MeasuringEquipment => {
                "SELECT designation, inventory_number as entity_number \
                 FROM measuring_equipment WHERE id = $1"
            }
            ItemType::ClampingDevice => {
                "SELECT designation, inventory_number as entity_number \
                 FROM clamping_devices WHERE id = $1"
            }
        };

        let display = sqlx::query_as::<_, EntityDisplayRow>(query)
            .bind(entity_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(display)
    }
}
