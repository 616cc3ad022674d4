//! Stock operations: issue, receive, transfer, adjust, scrap
//!
//! Every operation mutates exactly the targeted condition bucket(s) and
//! appends one ledger row per affected storage item, inside a single
//! database transaction. The mutated rows are read with `FOR UPDATE` so
//! two concurrent operations on the same item serialize instead of
//! losing an update.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::storage::{
    ensure_compartment_active, ensure_entity_exists, validate_entity_input, StorageItemRow,
    StorageItemWithMetrics, STORAGE_ITEM_COLUMNS,
};
use shared::models::{Condition, ItemType, MovementType};
use shared::validation::{validate_absolute_quantity, validate_operation_quantity};

/// Stock operation service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Input for issue and scrap operations
#[derive(Debug, Deserialize)]
pub struct RemoveStockInput {
    pub storage_item_id: Uuid,
    pub condition: Condition,
    pub quantity: Decimal,
    pub reason: Option<String>,
}

/// Input for the receive operation
///
/// Either targets an existing storage item by id, or names the
/// (entity, compartment) pair; in the latter case the storage item is
/// created with zero buckets and default weights if it does not exist
/// yet ("receive doubles as create storage slot").
#[derive(Debug, Deserialize)]
pub struct ReceiveStockInput {
    pub storage_item_id: Option<Uuid>,
    pub compartment_id: Option<Uuid>,
    pub item_type: Option<ItemType>,
    pub tool_master_id: Option<Uuid>,
    pub measuring_equipment_id: Option<Uuid>,
    pub clamping_device_id: Option<Uuid>,
    pub condition: Condition,
    pub quantity: Decimal,
    pub reason: Option<String>,
}

/// Input for the transfer operation
#[derive(Debug, Deserialize)]
pub struct TransferStockInput {
    pub storage_item_id: Uuid,
    pub condition: Condition,
    pub quantity: Decimal,
    pub to_compartment_id: Uuid,
    pub reason: Option<String>,
}

/// Input for the adjust (inventory correction) operation
#[derive(Debug, Deserialize)]
pub struct AdjustStockInput {
    pub storage_item_id: Uuid,
    pub condition: Condition,
    /// Absolute new value for the bucket, not a delta
    pub new_quantity: Decimal,
    pub reason: Option<String>,
}

/// Result of a single-item stock operation
#[derive(Debug, Serialize)]
pub struct StockOperationResponse {
    pub item: StorageItemWithMetrics,
    pub message: String,
}

/// Result of a transfer, covering both affected storage items
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub origin: StorageItemWithMetrics,
    pub destination: StorageItemWithMetrics,
    pub message: String,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Issue stock for use (entnehmen)
    pub async fn issue(
        &self,
        user_id: Uuid,
        input: RemoveStockInput,
    ) -> AppResult<StockOperationResponse> {
        self.remove_stock(user_id, input, MovementType::Issue).await
    }

    /// Scrap stock (verschrotten)
    ///
    /// Same availability rules as issue, but logged as scrap so the
    /// ledger distinguishes "removed for good" from "issued for use".
    /// There is no reversal; stock received later is a separate event.
    pub async fn scrap(
        &self,
        user_id: Uuid,
        input: RemoveStockInput,
    ) -> AppResult<StockOperationResponse> {
        self.remove_stock(user_id, input, MovementType::Scrap).await
    }

    async fn remove_stock(
        &self,
        user_id: Uuid,
        input: RemoveStockInput,
        movement_type: MovementType,
    ) -> AppResult<StockOperationResponse> {
        validate_quantity(input.quantity)?;

        let mut tx = self.db.begin().await?;

        let item = lock_item(&mut tx, input.storage_item_id).await?;
        let before = bucket_value(&item, input.condition);

        if input.quantity > before {
            return Err(AppError::InsufficientStock {
                condition: input.condition.as_str().to_string(),
                available: before,
                requested: input.quantity,
            });
        }

        let after = before - input.quantity;
        write_quantity(&mut tx, item.id, input.condition, after).await?;
        record_movement(
            &mut tx,
            item.id,
            movement_type,
            input.condition,
            -input.quantity,
            before,
            after,
            input.reason.as_deref(),
            user_id,
        )
        .await?;

        tx.commit().await?;

        let verb = match movement_type {
            MovementType::Scrap => "Scrapped",
            _ => "Issued",
        };
        let message = format!("{} {} {} unit(s)", verb, input.quantity, input.condition);
        self.operation_response(input.storage_item_id, message).await
    }

    /// Receive stock into storage (einlagern)
    pub async fn receive(
        &self,
        user_id: Uuid,
        input: ReceiveStockInput,
    ) -> AppResult<StockOperationResponse> {
        validate_quantity(input.quantity)?;

        let mut tx = self.db.begin().await?;

        let item = match input.storage_item_id {
            Some(item_id) => lock_item(&mut tx, item_id).await?,
            None => {
                let compartment_id = input.compartment_id.ok_or_else(|| missing_target_error())?;
                let item_type = input.item_type.ok_or_else(|| missing_target_error())?;
                let entity_id = validate_entity_input(
                    item_type,
                    input.tool_master_id,
                    input.measuring_equipment_id,
                    input.clamping_device_id,
                )?;
                ensure_compartment_active(&self.db, compartment_id).await?;
                ensure_entity_exists(&self.db, item_type, entity_id).await?;
                find_or_create_item(&mut tx, compartment_id, item_type, entity_id).await?
            }
        };

        let before = bucket_value(&item, input.condition);
        let after = before + input.quantity;

        write_quantity(&mut tx, item.id, input.condition, after).await?;
        record_movement(
            &mut tx,
            item.id,
            MovementType::Receipt,
            input.condition,
            input.quantity,
            before,
            after,
            input.reason.as_deref(),
            user_id,
        )
        .await?;

        tx.commit().await?;

        let message = format!("Received {} {} unit(s)", input.quantity, input.condition);
        self.operation_response(item.id, message).await
    }

    /// Transfer stock between compartments
    ///
    /// Origin and destination are mutated in the same transaction, so the
    /// system-wide quantity for the entity and condition is conserved.
    /// Two ledger rows are written, one per side, for audit symmetry.
    pub async fn transfer(
        &self,
        user_id: Uuid,
        input: TransferStockInput,
    ) -> AppResult<TransferResponse> {
        validate_quantity(input.quantity)?;

        let mut tx = self.db.begin().await?;

        // Probe without locking to learn the entity reference and find a
        // possible destination row; the authoritative quantities are
        // re-read under the row locks taken below.
        let probe = sqlx::query_as::<_, StorageItemRow>(&format!(
            "SELECT {} FROM storage_items WHERE id = $1 AND deleted_at IS NULL",
            STORAGE_ITEM_COLUMNS
        ))
        .bind(input.storage_item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Storage item".to_string()))?;

        if probe.compartment_id == input.to_compartment_id {
            return Err(AppError::InvalidDestination {
                message: "Destination compartment equals the origin compartment".to_string(),
                message_de: "Ziel-Lagerfach entspricht dem Ursprungs-Lagerfach".to_string(),
            });
        }

        let destination_active = sqlx::query_scalar::<_, bool>(
            "SELECT is_active FROM storage_compartments WHERE id = $1",
        )
        .bind(input.to_compartment_id)
        .fetch_optional(&mut *tx)
        .await?;

        match destination_active {
            Some(true) => {}
            Some(false) => {
                return Err(AppError::InvalidDestination {
                    message: "Destination compartment is inactive".to_string(),
                    message_de: "Ziel-Lagerfach ist deaktiviert".to_string(),
                })
            }
            None => {
                return Err(AppError::InvalidDestination {
                    message: "Destination compartment does not exist".to_string(),
                    message_de: "Ziel-Lagerfach existiert nicht".to_string(),
                })
            }
        }

        let item_type = ItemType::from_str(&probe.item_type).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown item type in database: {}",
                probe.item_type
            ))
        })?;
        let entity_id = probe
            .tool_master_id
            .or(probe.measuring_equipment_id)
            .or(probe.clamping_device_id)
            .ok_or_else(|| {
                AppError::ReferenceConflict("Origin storage item has no entity reference".to_string())
            })?;

        let destination_id = sqlx::query_scalar::<_, Uuid>(&format!(
            "SELECT id FROM storage_items \
             WHERE compartment_id = $1 AND {} = $2 AND deleted_at IS NULL",
            entity_column(item_type)
        ))
        .bind(input.to_compartment_id)
        .bind(entity_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Both rows are locked in ascending id order so two opposing
        // concurrent transfers serialize instead of deadlocking
        let (origin, destination) = match destination_id {
            Some(destination_id)
                if lock_destination_first(input.storage_item_id, destination_id) =>
            {
                let destination = lock_item(&mut tx, destination_id).await?;
                let origin = lock_item(&mut tx, input.storage_item_id).await?;
                (origin, destination)
            }
            Some(destination_id) => {
                let origin = lock_item(&mut tx, input.storage_item_id).await?;
                let destination = lock_item(&mut tx, destination_id).await?;
                (origin, destination)
            }
            None => {
                let origin = lock_item(&mut tx, input.storage_item_id).await?;
                let destination =
                    find_or_create_item(&mut tx, input.to_compartment_id, item_type, entity_id)
                        .await?;
                (origin, destination)
            }
        };

        let origin_before = bucket_value(&origin, input.condition);
        if input.quantity > origin_before {
            return Err(AppError::InsufficientStock {
                condition: input.condition.as_str().to_string(),
                available: origin_before,
                requested: input.quantity,
            });
        }

        // Outgoing side
        let origin_after = origin_before - input.quantity;
        write_quantity(&mut tx, origin.id, input.condition, origin_after).await?;
        record_movement(
            &mut tx,
            origin.id,
            MovementType::Transfer,
            input.condition,
            -input.quantity,
            origin_before,
            origin_after,
            input.reason.as_deref(),
            user_id,
        )
        .await?;

        // Incoming side
        let dest_before = bucket_value(&destination, input.condition);
        let dest_after = dest_before + input.quantity;
        write_quantity(&mut tx, destination.id, input.condition, dest_after).await?;
        record_movement(
            &mut tx,
            destination.id,
            MovementType::Transfer,
            input.condition,
            input.quantity,
            dest_before,
            dest_after,
            input.reason.as_deref(),
            user_id,
        )
        .await?;

        tx.commit().await?;

        let origin_item = self.fetch_with_metrics(origin.id).await?;
        let destination_item = self.fetch_with_metrics(destination.id).await?;
        let message = format!(
            "Transferred {} {} unit(s) to compartment {}",
            input.quantity, input.condition, input.to_compartment_id
        );

        Ok(TransferResponse {
            origin: origin_item,
            destination: destination_item,
            message,
        })
    }

    /// Inventory correction to an absolute bucket value
    pub async fn adjust(
        &self,
        user_id: Uuid,
        input: AdjustStockInput,
    ) -> AppResult<StockOperationResponse> {
        validate_absolute_quantity(input.new_quantity).map_err(|msg| AppError::InvalidQuantity {
            field: "new_quantity".to_string(),
            message: msg.to_string(),
            message_de: "Menge darf nicht negativ sein".to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let item = lock_item(&mut tx, input.storage_item_id).await?;
        let before = bucket_value(&item, input.condition);
        let delta = input.new_quantity - before;

        write_quantity(&mut tx, item.id, input.condition, input.new_quantity).await?;
        record_movement(
            &mut tx,
            item.id,
            MovementType::Adjustment,
            input.condition,
            delta,
            before,
            input.new_quantity,
            input.reason.as_deref(),
            user_id,
        )
        .await?;

        tx.commit().await?;

        let message = format!(
            "Adjusted {} bucket from {} to {}",
            input.condition, before, input.new_quantity
        );
        self.operation_response(input.storage_item_id, message).await
    }

    async fn operation_response(
        &self,
        item_id: Uuid,
        message: String,
    ) -> AppResult<StockOperationResponse> {
        let item = self.fetch_with_metrics(item_id).await?;
        Ok(StockOperationResponse { item, message })
    }

    async fn fetch_with_metrics(&self, item_id: Uuid) -> AppResult<StorageItemWithMetrics> {
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
}

fn validate_quantity(quantity: Decimal) -> AppResult<()> {
    validate_operation_quantity(quantity).map_err(|msg| AppError::InvalidQuantity {
        field: "quantity".to_string(),
        message: msg.to_string(),
        message_de: "Menge muss positiv sein".to_string(),
    })
}

fn missing_target_error() -> AppError {
    AppError::Validation {
        field: "storage_item_id".to_string(),
        message: "Either storage_item_id or compartment_id with item_type and an entity reference must be provided".to_string(),
        message_de: "Entweder storage_item_id oder compartment_id mit item_type und Artikelreferenz angeben".to_string(),
    }
}

/// Quantity of the given condition bucket on a raw row
fn bucket_value(row: &StorageItemRow, condition: Condition) -> Decimal {
    match condition {
        Condition::New => row.quantity_new,
        Condition::Used => row.quantity_used,
        Condition::Reground => row.quantity_reground,
    }
}

/// Column holding the given condition bucket
fn quantity_column(condition: Condition) -> &'static str {
    match condition {
        Condition::New => "quantity_new",
        Condition::Used => "quantity_used",
        Condition::Reground => "quantity_reground",
    }
}

/// Read a storage item row inside the transaction, taking a row lock
async fn lock_item(
    tx: &mut Transaction<'_, Postgres>,
    item_id: Uuid,
) -> AppResult<StorageItemRow> {
    sqlx::query_as::<_, StorageItemRow>(&format!(
        "SELECT {} FROM storage_items WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        STORAGE_ITEM_COLUMNS
    ))
    .bind(item_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Storage item".to_string()))
}

/// Write a bucket value; `updated_at` moves with every quantity change
async fn write_quantity(
    tx: &mut Transaction<'_, Postgres>,
    item_id: Uuid,
    condition: Condition,
    value: Decimal,
) -> AppResult<()> {
    sqlx::query(&format!(
        "UPDATE storage_items SET {} = $1, updated_at = NOW() WHERE id = $2",
        quantity_column(condition)
    ))
    .bind(value)
    .bind(item_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Append one ledger row
#[allow(clippy::too_many_arguments)]
async fn record_movement(
    tx: &mut Transaction<'_, Postgres>,
    storage_item_id: Uuid,
    movement_type: MovementType,
    condition: Condition,
    quantity: Decimal,
    quantity_before: Decimal,
    quantity_after: Decimal,
    reason: Option<&str>,
    performed_by: Uuid,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_movements (
            storage_item_id, movement_type, condition, quantity,
            quantity_before, quantity_after, reason, performed_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(storage_item_id)
    .bind(movement_type.as_str())
    .bind(condition.as_str())
    .bind(quantity)
    .bind(quantity_before)
    .bind(quantity_after)
    .bind(reason)
    .bind(performed_by)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Whether a transfer must lock the destination row before the origin.
/// Row locks are always taken in ascending item id.
fn lock_destination_first(origin_id: Uuid, destination_id: Uuid) -> bool {
    destination_id < origin_id
}

/// Entity reference column for an item type
fn entity_column(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Tool | ItemType::Insert | ItemType::Accessory => "tool_master_id",
        ItemType::MeasuringEquipment => "measuring_equipment_id",
        ItemType::ClampingDevice => "clamping_device_id",
    }
}

/// Find the storage item for an (entity, compartment) pair inside the
/// transaction, locking it; create it with zero buckets and default
/// weights when it does not exist yet
///
/// Creation goes through `ON CONFLICT DO NOTHING` against the partial
/// unique index on (compartment, entity), so two transactions racing to
/// create the same slot end up sharing one row instead of splitting the
/// quantity record across duplicates.
async fn find_or_create_item(
    tx: &mut Transaction<'_, Postgres>,
    compartment_id: Uuid,
    item_type: ItemType,
    entity_id: Uuid,
) -> AppResult<StorageItemRow> {
    let entity_column = entity_column(item_type);

    let existing = sqlx::query_as::<_, StorageItemRow>(&format!(
        "SELECT {} FROM storage_items \
         WHERE compartment_id = $1 AND {} = $2 AND deleted_at IS NULL FOR UPDATE",
        STORAGE_ITEM_COLUMNS, entity_column
    ))
    .bind(compartment_id)
    .bind(entity_id)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(row) = existing {
        return Ok(row);
    }

    let inserted = sqlx::query_as::<_, StorageItemRow>(&format!(
        r#"
        INSERT INTO storage_items (compartment_id, item_type, {entity})
        VALUES ($1, $2, $3)
        ON CONFLICT (compartment_id, {entity}) WHERE deleted_at IS NULL DO NOTHING
        RETURNING {columns}
        "#,
        entity = entity_column,
        columns = STORAGE_ITEM_COLUMNS
    ))
    .bind(compartment_id)
    .bind(item_type.as_str())
    .bind(entity_id)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(row) = inserted {
        return Ok(row);
    }

    // Lost the creation race; the winner's row is committed and lockable now
    sqlx::query_as::<_, StorageItemRow>(&format!(
        "SELECT {} FROM storage_items \
         WHERE compartment_id = $1 AND {} = $2 AND deleted_at IS NULL FOR UPDATE",
        STORAGE_ITEM_COLUMNS, entity_column
    ))
    .bind(compartment_id)
    .bind(entity_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| {
        AppError::Internal("Storage item vanished between insert and lock".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_locks_in_ascending_id_order() {
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);

        // Opposing transfers between the same two items must agree on
        // which row is locked first
        assert!(lock_destination_first(high, low));
        assert!(!lock_destination_first(low, high));
        assert!(!lock_destination_first(low, low));
    }

    #[test]
    fn test_entity_column_per_item_type() {
        assert_eq!(entity_column(ItemType::Tool), "tool_master_id");
        assert_eq!(entity_column(ItemType::Insert), "tool_master_id");
        assert_eq!(entity_column(ItemType::Accessory), "tool_master_id");
        assert_eq!(
            entity_column(ItemType::MeasuringEquipment),
            "measuring_equipment_id"
        );
        assert_eq!(entity_column(ItemType::ClampingDevice), "clamping_device_id");
    }
}
