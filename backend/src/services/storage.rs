//! Storage item service for managing quantity records per compartment

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{ItemType, StorageItem};
use shared::stock::StockMetrics;
use shared::validation::{required_reference, validate_weight};

/// Columns selected for every storage item query
pub(crate) const STORAGE_ITEM_COLUMNS: &str = "id, compartment_id, item_type, tool_master_id, \
     measuring_equipment_id, clamping_device_id, quantity_new, quantity_used, quantity_reground, \
     weight_new, weight_used, weight_reground, min_quantity, max_quantity, reorder_point, \
     enable_low_stock_alert, notes, created_at, updated_at, deleted_at";

/// Storage item service
#[derive(Clone)]
pub struct StorageItemService {
    db: PgPool,
}

/// Database row for a storage item
///
/// `item_type` is stored as text; conversion into the closed enum happens
/// in [`StorageItemRow::into_model`].
#[derive(Debug, Clone, FromRow)]
pub(crate) struct StorageItemRow {
    pub id: Uuid,
    pub compartment_id: Uuid,
    pub item_type: String,
    pub tool_master_id: Option<Uuid>,
    pub measuring_equipment_id: Option<Uuid>,
    pub clamping_device_id: Option<Uuid>,
    pub quantity_new: Decimal,
    pub quantity_used: Decimal,
    pub quantity_reground: Decimal,
    pub weight_new: Option<Decimal>,
    pub weight_used: Option<Decimal>,
    pub weight_reground: Option<Decimal>,
    pub min_quantity: Option<Decimal>,
    pub max_quantity: Option<Decimal>,
    pub reorder_point: Option<Decimal>,
    pub enable_low_stock_alert: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl StorageItemRow {
    pub(crate) fn into_model(self) -> AppResult<StorageItem> {
        let item_type = ItemType::from_str(&self.item_type).ok_or_else(|| {
            AppError::Internal(format!("Unknown item type in database: {}", self.item_type))
        })?;
        Ok(StorageItem {
            id: self.id,
            compartment_id: self.compartment_id,
            item_type,
            tool_master_id: self.tool_master_id,
            measuring_equipment_id: self.measuring_equipment_id,
            clamping_device_id: self.clamping_device_id,
            quantity_new: self.quantity_new,
            quantity_used: self.quantity_used,
            quantity_reground: self.quantity_reground,
            weight_new: self.weight_new,
            weight_used: self.weight_used,
            weight_reground: self.weight_reground,
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
            reorder_point: self.reorder_point,
            enable_low_stock_alert: self.enable_low_stock_alert,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

/// Storage item together with its derived metrics
#[derive(Debug, Clone, Serialize)]
pub struct StorageItemWithMetrics {
    #[serde(flatten)]
    pub item: StorageItem,
    pub metrics: StockMetrics,
}

impl StorageItemWithMetrics {
    pub fn new(item: StorageItem) -> Self {
        let metrics = StockMetrics::for_item(&item);
        Self { item, metrics }
    }
}

/// Input for creating a storage item
#[derive(Debug, Deserialize)]
pub struct CreateStorageItemInput {
    pub compartment_id: Uuid,
    pub item_type: ItemType,
    pub tool_master_id: Option<Uuid>,
    pub measuring_equipment_id: Option<Uuid>,
    pub clamping_device_id: Option<Uuid>,
    pub weight_new: Option<Decimal>,
    pub weight_used: Option<Decimal>,
    pub weight_reground: Option<Decimal>,
    pub min_quantity: Option<Decimal>,
    pub max_quantity: Option<Decimal>,
    pub reorder_point: Option<Decimal>,
    pub enable_low_stock_alert: Option<bool>,
    pub notes: Option<String>,
}

/// Input for updating weights, thresholds, and notes of a storage item
///
/// Quantities are deliberately not updatable here; they only change
/// through the stock operations so the ledger stays complete.
#[derive(Debug, Deserialize)]
pub struct UpdateStorageItemInput {
    pub weight_new: Option<Decimal>,
    pub weight_used: Option<Decimal>,
    pub weight_reground: Option<Decimal>,
    pub min_quantity: Option<Decimal>,
    pub max_quantity: Option<Decimal>,
    pub reorder_point: Option<Decimal>,
    pub enable_low_stock_alert: Option<bool>,
    pub notes: Option<String>,
}

/// Filters for listing storage items
#[derive(Debug, Default, Deserialize)]
pub struct ListStorageItemsFilter {
    pub compartment_id: Option<Uuid>,
    pub low_stock_only: Option<bool>,
}

impl StorageItemService {
    /// Create a new StorageItemService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a storage item with zero quantities
    pub async fn create_item(
        &self,
        input: CreateStorageItemInput,
    ) -> AppResult<StorageItemWithMetrics> {
        let entity_id = validate_entity_input(
            input.item_type,
            input.tool_master_id,
            input.measuring_equipment_id,
            input.clamping_device_id,
        )?;

        for weight in [input.weight_new, input.weight_used, input.weight_reground]
            .into_iter()
            .flatten()
        {
            validate_weight(weight).map_err(|msg| AppError::Validation {
                field: "weight".to_string(),
                message: msg.to_string(),
                message_de: "Gewichtung muss zwischen 0,0 und 1,0 liegen".to_string(),
            })?;
        }

        ensure_compartment_active(&self.db, input.compartment_id).await?;
        ensure_entity_exists(&self.db, input.item_type, entity_id).await?;

        // One storage item per (entity, compartment) pair
        let duplicate = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM storage_items
                WHERE compartment_id = $1 AND deleted_at IS NULL
                  AND (tool_master_id = $2 OR measuring_equipment_id = $2 OR clamping_device_id = $2)
            )
            "#,
        )
        .bind(input.compartment_id)
        .bind(entity_id)
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::DuplicateEntry("storage item".to_string()));
        }

        let row = sqlx::query_as::<_, StorageItemRow>(&format!(
            r#"
            INSERT INTO storage_items (
                compartment_id, item_type, tool_master_id, measuring_equipment_id,
                clamping_device_id, weight_new, weight_used, weight_reground,
                min_quantity, max_quantity, reorder_point, enable_low_stock_alert, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            STORAGE_ITEM_COLUMNS
        ))
        .bind(input.compartment_id)
        .bind(input.item_type.as_str())
        .bind(input.tool_master_id)
        .bind(input.measuring_equipment_id)
        .bind(input.clamping_device_id)
        .bind(input.weight_new)
        .bind(input.weight_used)
        .bind(input.weight_reground)
        .bind(input.min_quantity)
        .bind(input.max_quantity)
        .bind(input.reorder_point)
        .bind(input.enable_low_stock_alert.unwrap_or(false))
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            // The partial unique index on (compartment, entity) catches
            // concurrent creates the EXISTS pre-check cannot see
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::DuplicateEntry("storage item".to_string())
            }
            other => AppError::DatabaseError(other),
        })?;

        Ok(StorageItemWithMetrics::new(row.into_model()?))
    }

    /// Get a storage item by id with derived metrics
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<StorageItemWithMetrics> {
        let row = sqlx::query_as::<_, StorageItemRow>(&format!(
            "SELECT {} FROM storage_items WHERE id = $1 AND deleted_at IS NULL",
            STORAGE_ITEM_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Storage item".to_string()))?;

        Ok(StorageItemWithMetrics::new(row.into_model()?))
    }

    /// List storage items, optionally filtered by compartment or low stock
    pub async fn list_items(
        &self,
        filter: ListStorageItemsFilter,
    ) -> AppResult<Vec<StorageItemWithMetrics>> {
        let rows = match filter.compartment_id {
            Some(compartment_id) => {
                sqlx::query_as::<_, StorageItemRow>(&format!(
                    "SELECT {} FROM storage_items \
                     WHERE compartment_id = $1 AND deleted_at IS NULL ORDER BY created_at ASC",
                    STORAGE_ITEM_COLUMNS
                ))
                .bind(compartment_id)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, StorageItemRow>(&format!(
                    "SELECT {} FROM storage_items \
                     WHERE deleted_at IS NULL ORDER BY created_at ASC",
                    STORAGE_ITEM_COLUMNS
                ))
                .fetch_all(&self.db)
                .await?
            }
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(StorageItemWithMetrics::new(row.into_model()?));
        }

        // Low-stock filtering happens on the computed metric, not in SQL,
        // so it cannot diverge from the calculator
        if filter.low_stock_only.unwrap_or(false) {
            items.retain(|i| i.metrics.is_low_stock);
        }

        Ok(items)
    }

    /// Update weights, thresholds, and notes of a storage item
    pub async fn update_item(
        &self,
        item_id: Uuid,
        input: UpdateStorageItemInput,
    ) -> AppResult<StorageItemWithMetrics> {
        let existing = sqlx::query_as::<_, StorageItemRow>(&format!(
            "SELECT {} FROM storage_items WHERE id = $1 AND deleted_at IS NULL",
            STORAGE_ITEM_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Storage item".to_string()))?;

        let weight_new = input.weight_new.or(existing.weight_new);
        let weight_used = input.weight_used.or(existing.weight_used);
        let weight_reground = input.weight_reground.or(existing.weight_reground);

        for weight in [weight_new, weight_used, weight_reground]
            .into_iter()
            .flatten()
        {
            validate_weight(weight).map_err(|msg| AppError::Validation {
                field: "weight".to_string(),
                message: msg.to_string(),
                message_de: "Gewichtung muss zwischen 0,0 und 1,0 liegen".to_string(),
            })?;
        }

        let row = sqlx::query_as::<_, StorageItemRow>(&format!(
            r#"
            UPDATE storage_items
            SET weight_new = $1, weight_used = $2, weight_reground = $3,
                min_quantity = $4, max_quantity = $5, reorder_point = $6,
                enable_low_stock_alert = $7, notes = $8, updated_at = NOW()
            WHERE id = $9
            RETURNING {}
            "#,
            STORAGE_ITEM_COLUMNS
        ))
        .bind(weight_new)
        .bind(weight_used)
        .bind(weight_reground)
        .bind(input.min_quantity.or(existing.min_quantity))
        .bind(input.max_quantity.or(existing.max_quantity))
        .bind(input.reorder_point.or(existing.reorder_point))
        .bind(
            input
                .enable_low_stock_alert
                .unwrap_or(existing.enable_low_stock_alert),
        )
        .bind(input.notes.or(existing.notes))
        .bind(item_id)
        .fetch_one(&self.db)
        .await?;

        Ok(StorageItemWithMetrics::new(row.into_model()?))
    }

    /// Soft-delete a storage item; only allowed once all buckets are empty
    pub async fn delete_item(&self, item_id: Uuid) -> AppResult<()> {
        let row = sqlx::query_as::<_, StorageItemRow>(&format!(
            "SELECT {} FROM storage_items WHERE id = $1 AND deleted_at IS NULL",
            STORAGE_ITEM_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Storage item".to_string()))?;

        let total = row.quantity_new + row.quantity_used + row.quantity_reground;
        if total != Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: format!(
                    "Storage item still holds {} units; issue, transfer, or scrap them first",
                    total
                ),
                message_de: format!(
                    "Lagerplatz enthält noch {} Einheiten; erst entnehmen, umlagern oder verschrotten",
                    total
                ),
            });
        }

        sqlx::query("UPDATE storage_items SET deleted_at = NOW() WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

/// Check the mutually-exclusive entity reference of a create request and
/// return the single referenced entity id
pub(crate) fn validate_entity_input(
    item_type: ItemType,
    tool_master_id: Option<Uuid>,
    measuring_equipment_id: Option<Uuid>,
    clamping_device_id: Option<Uuid>,
) -> AppResult<Uuid> {
    let refs = [tool_master_id, measuring_equipment_id, clamping_device_id];
    if refs.iter().filter(|r| r.is_some()).count() > 1 {
        return Err(AppError::ReferenceConflict(
            "At most one of tool_master_id, measuring_equipment_id, clamping_device_id may be set"
                .to_string(),
        ));
    }

    let expected = required_reference(item_type);
    let entity_id = match item_type {
        ItemType::Tool | ItemType::Insert | ItemType::Accessory => tool_master_id,
        ItemType::MeasuringEquipment => measuring_equipment_id,
        ItemType::ClampingDevice => clamping_device_id,
    };

    entity_id.ok_or_else(|| {
        AppError::ReferenceConflict(format!(
            "Item type '{}' requires {}",
            item_type.as_str(),
            expected
        ))
    })
}

/// Validate a compartment exists and is active
pub(crate) async fn ensure_compartment_active(db: &PgPool, compartment_id: Uuid) -> AppResult<()> {
    let active =
        sqlx::query_scalar::<_, bool>("SELECT is_active FROM storage_compartments WHERE id = $1")
            .bind(compartment_id)
            .fetch_optional(db)
            .await?;

    match active {
        Some(true) => Ok(()),
        Some(false) => Err(AppError::Validation {
            field: "compartment_id".to_string(),
            message: "Compartment is inactive".to_string(),
            message_de: "Lagerfach ist deaktiviert".to_string(),
        }),
        None => Err(AppError::NotFound("Compartment".to_string())),
    }
}

/// Validate the referenced inventory entity exists
pub(crate) async fn ensure_entity_exists(
    db: &PgPool,
    item_type: ItemType,
    entity_id: Uuid,
) -> AppResult<()> {
    let table = match item_type {
        ItemType::Tool | ItemType::Insert | ItemType::Accessory => "tool_masters",
        ItemType::MeasuringEquipment => "measuring_equipment",
        ItemType::ClampingDevice => "clamping_devices",
    };

    let exists = sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
        table
    ))
    .bind(entity_id)
    .fetch_one(db)
    .await?;

    if exists {
        Ok(())
    } else {
        Err(AppError::NotFound("Inventory entity".to_string()))
    }
}
