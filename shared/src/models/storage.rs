//! Storage item model and condition buckets

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of inventory entity a storage item holds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Tool,
    Insert,
    Accessory,
    MeasuringEquipment,
    ClampingDevice,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Tool => "tool",
            ItemType::Insert => "insert",
            ItemType::Accessory => "accessory",
            ItemType::MeasuringEquipment => "measuring_equipment",
            ItemType::ClampingDevice => "clamping_device",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tool" => Some(ItemType::Tool),
            "insert" => Some(ItemType::Insert),
            "accessory" => Some(ItemType::Accessory),
            "measuring_equipment" => Some(ItemType::MeasuringEquipment),
            "clamping_device" => Some(ItemType::ClampingDevice),
            _ => None,
        }
    }
}

/// Condition of stock within a storage item
///
/// Each condition is tracked as its own quantity bucket. Access to the
/// buckets always goes through [`StorageItem::quantity`] and
/// [`StorageItem::set_quantity`] so an invalid condition cannot address
/// a nonexistent field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    Used,
    Reground,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::New, Condition::Used, Condition::Reground];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
            Condition::Reground => "reground",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Condition::New),
            "used" => Some(Condition::Used),
            "reground" => Some(Condition::Reground),
            _ => None,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A quantity record tying one inventory entity to one storage compartment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageItem {
    pub id: Uuid,
    pub compartment_id: Uuid,
    pub item_type: ItemType,
    /// At most one of the three entity references is set, and it must
    /// agree with `item_type`
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

impl StorageItem {
    /// Quantity in the given condition bucket
    pub fn quantity(&self, condition: Condition) -> Decimal {
        match condition {
            Condition::New => self.quantity_new,
            Condition::Used => self.quantity_used,
            Condition::Reground => self.quantity_reground,
        }
    }

    /// Set the quantity of the given condition bucket
    pub fn set_quantity(&mut self, condition: Condition, value: Decimal) {
        match condition {
            Condition::New => self.quantity_new = value,
            Condition::Used => self.quantity_used = value,
            Condition::Reground => self.quantity_reground = value,
        }
    }

    /// Condition weight, falling back to the built-in default when unset
    pub fn weight(&self, condition: Condition) -> Decimal {
        let configured = match condition {
            Condition::New => self.weight_new,
            Condition::Used => self.weight_used,
            Condition::Reground => self.weight_reground,
        };
        configured.unwrap_or_else(|| crate::stock::default_weight(condition))
    }

    /// The entity id this item references, whichever of the three it is
    pub fn entity_id(&self) -> Option<Uuid> {
        self.tool_master_id
            .or(self.measuring_equipment_id)
            .or(self.clamping_device_id)
    }

    /// Check the mutually-exclusive entity reference invariant:
    /// exactly one reference is set and it matches `item_type`
    pub fn entity_reference_consistent(&self) -> bool {
        let refs = [
            self.tool_master_id,
            self.measuring_equipment_id,
            self.clamping_device_id,
        ];
        if refs.iter().filter(|r| r.is_some()).count() != 1 {
            return false;
        }
        match self.item_type {
            ItemType::Tool | ItemType::Insert | ItemType::Accessory => {
                self.tool_master_id.is_some()
            }
            ItemType::MeasuringEquipment => self.measuring_equipment_id.is_some(),
            ItemType::ClampingDevice => self.clamping_device_id.is_some(),
        }
    }
}
