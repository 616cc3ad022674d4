//! Stock movement ledger models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Condition;

/// Types of stock movements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Stock taken out for use (entnehmen)
    Issue,
    /// Stock put into storage (einlagern)
    Receipt,
    /// Stock moved between compartments; the sign of the delta tells
    /// the side (negative on the origin row, positive on the destination)
    Transfer,
    /// Inventory correction to an absolute value
    Adjustment,
    /// Stock removed from the system for good (verschrotten)
    Scrap,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Issue => "issue",
            MovementType::Receipt => "receipt",
            MovementType::Transfer => "transfer",
            MovementType::Adjustment => "adjustment",
            MovementType::Scrap => "scrap",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "issue" => Some(MovementType::Issue),
            "receipt" => Some(MovementType::Receipt),
            "transfer" => Some(MovementType::Transfer),
            "adjustment" => Some(MovementType::Adjustment),
            "scrap" => Some(MovementType::Scrap),
            _ => None,
        }
    }
}

/// One row of the append-only movement ledger
///
/// Movements are never updated or deleted; `quantity_before` and
/// `quantity_after` snapshot the affected condition bucket on the row's
/// own storage item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub storage_item_id: Uuid,
    pub movement_type: MovementType,
    pub condition: Condition,
    /// Signed delta actually applied to the bucket
    pub quantity: Decimal,
    pub quantity_before: Decimal,
    pub quantity_after: Decimal,
    pub reason: Option<String>,
    pub performed_by: Uuid,
    pub performed_at: DateTime<Utc>,
}
