//! Pure derived-metric calculators for storage items
//!
//! Total stock, weighted effective stock, low-stock alerting, and stock
//! level percentage are never persisted; every layer recomputes them from
//! the stored quantities through the functions in this module so the
//! numbers cannot drift between callers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Condition, ItemType, StorageItem};

/// Total units below which an item is always reported critical,
/// regardless of its configured thresholds
const CRITICAL_TOTAL_THRESHOLD: u32 = 3;

/// Classification of item types for stock calculations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemClass {
    /// Tools, inserts, accessories: countable, condition-weighted
    ToolLike,
    /// Unique serialized asset, effective stock is always 1
    MeasuringEquipment,
    /// Countable but condition weighting is not meaningful
    ClampingDevice,
}

impl From<ItemType> for ItemClass {
    fn from(item_type: ItemType) -> Self {
        match item_type {
            ItemType::Tool | ItemType::Insert | ItemType::Accessory => ItemClass::ToolLike,
            ItemType::MeasuringEquipment => ItemClass::MeasuringEquipment,
            ItemType::ClampingDevice => ItemClass::ClampingDevice,
        }
    }
}

/// Traffic-light stock status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Ok,
    Warning,
    Critical,
}

/// Default condition weight used when an item has none configured
pub fn default_weight(condition: Condition) -> Decimal {
    match condition {
        Condition::New => Decimal::ONE,
        Condition::Used => Decimal::new(5, 1),
        Condition::Reground => Decimal::new(8, 1),
    }
}

/// Sum of all three condition buckets
pub fn total_stock(item: &StorageItem) -> Decimal {
    item.quantity_new + item.quantity_used + item.quantity_reground
}

/// Condition-discounted stock used for reorder decisions
///
/// Tool-like items weight each bucket (defaults 1.0 / 0.5 / 0.8).
/// Clamping devices count unweighted. Measuring equipment is a unique
/// asset, so its effective stock is always exactly 1.
pub fn effective_stock(item: &StorageItem) -> Decimal {
    match ItemClass::from(item.item_type) {
        ItemClass::ToolLike => Condition::ALL
            .iter()
            .map(|&c| item.quantity(c) * item.weight(c))
            .sum(),
        ItemClass::MeasuringEquipment => Decimal::ONE,
        ItemClass::ClampingDevice => total_stock(item),
    }
}

/// Whether the item is below its reorder point
///
/// Only meaningful for tool-like items with alerting enabled and a
/// reorder point configured; everything else is never low.
pub fn is_low_stock(item: &StorageItem) -> bool {
    if !item.enable_low_stock_alert {
        return false;
    }
    if ItemClass::from(item.item_type) != ItemClass::ToolLike {
        return false;
    }
    match item.reorder_point {
        Some(reorder_point) => effective_stock(item) <= reorder_point,
        None => false,
    }
}

/// Fill level as a percentage of `max_quantity`, rounded to two decimals
///
/// `None` when no positive maximum is configured or the item is not
/// tool-like.
pub fn stock_level_percent(item: &StorageItem) -> Option<Decimal> {
    if ItemClass::from(item.item_type) != ItemClass::ToolLike {
        return None;
    }
    match item.max_quantity {
        Some(max) if max > Decimal::ZERO => {
            Some((total_stock(item) / max * Decimal::from(100)).round_dp(2))
        }
        _ => None,
    }
}

/// Traffic-light status for an item
///
/// Critical below a flat total of 3 units independent of any configured
/// threshold; warning when the effective stock has fallen below the
/// reorder point; ok otherwise.
pub fn stock_status(item: &StorageItem) -> StockStatus {
    if total_stock(item) < Decimal::from(CRITICAL_TOTAL_THRESHOLD) {
        return StockStatus::Critical;
    }
    if item.enable_low_stock_alert {
        if let Some(reorder_point) = item.reorder_point {
            if effective_stock(item) < reorder_point {
                return StockStatus::Warning;
            }
        }
    }
    StockStatus::Ok
}

/// All derived metrics for a storage item, computed in one place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMetrics {
    pub total_stock: Decimal,
    pub effective_stock: Decimal,
    pub is_low_stock: bool,
    pub stock_level_percent: Option<Decimal>,
    pub stock_status: StockStatus,
}

impl StockMetrics {
    pub fn for_item(item: &StorageItem) -> Self {
        Self {
            total_stock: total_stock(item),
            effective_stock: effective_stock(item),
            is_low_stock: is_low_stock(item),
            stock_level_percent: stock_level_percent(item),
            stock_status: stock_status(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tool_item(new: &str, used: &str, reground: &str) -> StorageItem {
        let now = Utc::now();
        StorageItem {
            id: Uuid::new_v4(),
            compartment_id: Uuid::new_v4(),
            item_type: ItemType::Tool,
            tool_master_id: Some(Uuid::new_v4()),
            measuring_equipment_id: None,
            clamping_device_id: None,
            quantity_new: dec(new),
            quantity_used: dec(used),
            quantity_reground: dec(reground),
            weight_new: None,
            weight_used: None,
            weight_reground: None,
            min_quantity: None,
            max_quantity: None,
            reorder_point: None,
            enable_low_stock_alert: false,
            notes: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_total_stock_sums_buckets() {
        let item = tool_item("10", "4", "2");
        assert_eq!(total_stock(&item), dec("16"));
    }

    #[test]
    fn test_effective_stock_default_weights() {
        // 10*1.0 + 4*0.5 + 2*0.8 = 13.6
        let item = tool_item("10", "4", "2");
        assert_eq!(effective_stock(&item), dec("13.6"));
    }

    #[test]
    fn test_effective_stock_configured_weights() {
        let mut item = tool_item("10", "4", "2");
        item.weight_used = Some(dec("0.25"));
        item.weight_reground = Some(dec("1.0"));
        // 10*1.0 + 4*0.25 + 2*1.0 = 13
        assert_eq!(effective_stock(&item), dec("13"));
    }

    #[test]
    fn test_effective_stock_measuring_equipment_is_one() {
        let mut item = tool_item("10", "4", "2");
        item.item_type = ItemType::MeasuringEquipment;
        item.tool_master_id = None;
        item.measuring_equipment_id = Some(Uuid::new_v4());
        assert_eq!(effective_stock(&item), Decimal::ONE);
    }

    #[test]
    fn test_effective_stock_clamping_device_unweighted() {
        let mut item = tool_item("3", "2", "1");
        item.item_type = ItemType::ClampingDevice;
        item.tool_master_id = None;
        item.clamping_device_id = Some(Uuid::new_v4());
        assert_eq!(effective_stock(&item), dec("6"));
    }

    #[test]
    fn test_is_low_stock_at_reorder_point() {
        let mut item = tool_item("10", "4", "2");
        item.enable_low_stock_alert = true;
        item.reorder_point = Some(dec("15"));
        // effective stock 13.6 <= 15
        assert!(is_low_stock(&item));

        item.reorder_point = Some(dec("10"));
        assert!(!is_low_stock(&item));
    }

    #[test]
    fn test_is_low_stock_requires_alert_and_reorder_point() {
        let mut item = tool_item("0", "0", "0");
        assert!(!is_low_stock(&item));

        item.enable_low_stock_alert = true;
        assert!(!is_low_stock(&item));

        item.reorder_point = Some(dec("5"));
        assert!(is_low_stock(&item));
    }

    #[test]
    fn test_is_low_stock_never_for_clamping_devices() {
        let mut item = tool_item("0", "0", "0");
        item.item_type = ItemType::ClampingDevice;
        item.tool_master_id = None;
        item.clamping_device_id = Some(Uuid::new_v4());
        item.enable_low_stock_alert = true;
        item.reorder_point = Some(dec("5"));
        assert!(!is_low_stock(&item));
    }

    #[test]
    fn test_stock_level_percent() {
        let mut item = tool_item("10", "4", "2");
        assert_eq!(stock_level_percent(&item), None);

        item.max_quantity = Some(dec("24"));
        // 16 / 24 * 100 = 66.67
        assert_eq!(stock_level_percent(&item), Some(dec("66.67")));

        item.max_quantity = Some(Decimal::ZERO);
        assert_eq!(stock_level_percent(&item), None);
    }

    #[test]
    fn test_stock_status_critical_below_three_total() {
        let item = tool_item("2", "0", "0");
        assert_eq!(stock_status(&item), StockStatus::Critical);

        let item = tool_item("3", "0", "0");
        assert_eq!(stock_status(&item), StockStatus::Ok);
    }

    #[test]
    fn test_stock_status_warning_below_reorder_point() {
        let mut item = tool_item("10", "4", "2");
        item.enable_low_stock_alert = true;
        item.reorder_point = Some(dec("14"));
        assert_eq!(stock_status(&item), StockStatus::Warning);

        // At the reorder point exactly, status is not warning
        item.reorder_point = Some(dec("13.6"));
        assert_eq!(stock_status(&item), StockStatus::Ok);
    }

    #[test]
    fn test_metrics_bundle_matches_individual_calculators() {
        let mut item = tool_item("10", "4", "2");
        item.enable_low_stock_alert = true;
        item.reorder_point = Some(dec("15"));
        item.max_quantity = Some(dec("20"));

        let metrics = StockMetrics::for_item(&item);
        assert_eq!(metrics.total_stock, total_stock(&item));
        assert_eq!(metrics.effective_stock, effective_stock(&item));
        assert_eq!(metrics.is_low_stock, is_low_stock(&item));
        assert_eq!(metrics.stock_level_percent, stock_level_percent(&item));
        assert_eq!(metrics.stock_status, stock_status(&item));
    }
}
