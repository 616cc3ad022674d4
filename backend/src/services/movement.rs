//! Movement ledger read service
//!
//! The ledger is append-only; this service only reads. Writes happen
//! exclusively inside the stock operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Condition, MovementType, StockMovement};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};

/// Movement ledger service
#[derive(Clone)]
pub struct MovementService {
    db: PgPool,
}

/// Database row for a stock movement
#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    storage_item_id: Uuid,
    movement_type: String,
    condition: String,
    quantity: Decimal,
    quantity_before: Decimal,
    quantity_after: Decimal,
    reason: Option<String>,
    performed_by: Uuid,
    performed_at: DateTime<Utc>,
}

impl MovementRow {
    fn into_model(self) -> AppResult<StockMovement> {
        let movement_type = MovementType::from_str(&self.movement_type).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown movement type in database: {}",
                self.movement_type
            ))
        })?;
        let condition = Condition::from_str(&self.condition).ok_or_else(|| {
            AppError::Internal(format!("Unknown condition in database: {}", self.condition))
        })?;
        Ok(StockMovement {
            id: self.id,
            storage_item_id: self.storage_item_id,
            movement_type,
            condition,
            quantity: self.quantity,
            quantity_before: self.quantity_before,
            quantity_after: self.quantity_after,
            reason: self.reason,
            performed_by: self.performed_by,
            performed_at: self.performed_at,
        })
    }
}

const MOVEMENT_COLUMNS: &str = "id, storage_item_id, movement_type, condition, quantity, \
     quantity_before, quantity_after, reason, performed_by, performed_at";

impl MovementService {
    /// Create a new MovementService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get movements for a storage item, most recent first
    pub async fn get_movements(
        &self,
        storage_item_id: Uuid,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<StockMovement>> {
        // Validate the storage item exists (deleted items keep their history)
        let item_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM storage_items WHERE id = $1)")
                .bind(storage_item_id)
                .fetch_one(&self.db)
                .await?;

        if !item_exists {
            return Err(AppError::NotFound("Storage item".to_string()));
        }

        let pagination = pagination.clamped();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM stock_movements WHERE storage_item_id = $1",
        )
        .bind(storage_item_id)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            "SELECT {} FROM stock_movements \
             WHERE storage_item_id = $1 \
             ORDER BY performed_at DESC, id DESC \
             LIMIT $2 OFFSET $3",
            MOVEMENT_COLUMNS
        ))
        .bind(storage_item_id)
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.db)
        .await?;

        let mut movements = Vec::with_capacity(rows.len());
        for row in rows {
            movements.push(row.into_model()?);
        }

        Ok(PaginatedResponse {
            data: movements,
            pagination: PaginationMeta {
                limit: pagination.limit,
                offset: pagination.offset,
                total,
            },
        })
    }

    /// List all movements across the crib, most recent first
    pub async fn list_movements(
        &self,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<StockMovement>> {
        let pagination = pagination.clamped();

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stock_movements")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            "SELECT {} FROM stock_movements \
             ORDER BY performed_at DESC, id DESC \
             LIMIT $1 OFFSET $2",
            MOVEMENT_COLUMNS
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.db)
        .await?;

        let mut movements = Vec::with_capacity(rows.len());
        for row in rows {
            movements.push(row.into_model()?);
        }

        Ok(PaginatedResponse {
            data: movements,
            pagination: PaginationMeta {
                limit: pagination.limit,
                offset: pagination.offset,
                total,
            },
        })
    }
}
