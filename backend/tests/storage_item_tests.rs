//! Storage item tests
//!
//! Tests for item identity and configuration rules:
//! - Mutually-exclusive entity references per item type
//! - Condition weight bounds
//! - Compartment code format
//! - Wire format of the closed enums

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{Condition, ItemType, StorageItem};
use shared::stock::{ItemClass, StockStatus};
use shared::types::Pagination;
use shared::validation::{
    required_reference, validate_compartment_code, validate_entity_reference, validate_weight,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn blank_item(item_type: ItemType) -> StorageItem {
    let now = chrono::Utc::now();
    StorageItem {
        id: uuid::Uuid::new_v4(),
        compartment_id: uuid::Uuid::new_v4(),
        item_type,
        tool_master_id: None,
        measuring_equipment_id: None,
        clamping_device_id: None,
        quantity_new: Decimal::ZERO,
        quantity_used: Decimal::ZERO,
        quantity_reground: Decimal::ZERO,
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

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Tools, inserts, and accessories all reference a tool master
    #[test]
    fn test_tool_like_types_require_tool_master() {
        for item_type in [ItemType::Tool, ItemType::Insert, ItemType::Accessory] {
            assert_eq!(required_reference(item_type), "tool_master_id");
            assert_eq!(ItemClass::from(item_type), ItemClass::ToolLike);

            let mut item = blank_item(item_type);
            assert!(validate_entity_reference(&item).is_err());

            item.tool_master_id = Some(uuid::Uuid::new_v4());
            assert!(validate_entity_reference(&item).is_ok());
        }
    }

    /// A measuring equipment item must not carry a tool master reference
    #[test]
    fn test_mismatched_reference_rejected() {
        let mut item = blank_item(ItemType::MeasuringEquipment);
        item.tool_master_id = Some(uuid::Uuid::new_v4());
        assert!(validate_entity_reference(&item).is_err());

        item.tool_master_id = None;
        item.measuring_equipment_id = Some(uuid::Uuid::new_v4());
        assert!(validate_entity_reference(&item).is_ok());
    }

    /// Two references at once are rejected even if one matches the type
    #[test]
    fn test_multiple_references_rejected() {
        let mut item = blank_item(ItemType::ClampingDevice);
        item.clamping_device_id = Some(uuid::Uuid::new_v4());
        item.tool_master_id = Some(uuid::Uuid::new_v4());
        assert!(validate_entity_reference(&item).is_err());
    }

    /// entity_id returns whichever reference is set
    #[test]
    fn test_entity_id_follows_set_reference() {
        let mut item = blank_item(ItemType::ClampingDevice);
        assert_eq!(item.entity_id(), None);

        let id = uuid::Uuid::new_v4();
        item.clamping_device_id = Some(id);
        assert_eq!(item.entity_id(), Some(id));
    }

    /// Weights are confined to [0, 1] inclusive
    #[test]
    fn test_weight_bounds() {
        assert!(validate_weight(Decimal::ZERO).is_ok());
        assert!(validate_weight(dec("0.5")).is_ok());
        assert!(validate_weight(Decimal::ONE).is_ok());
        assert!(validate_weight(dec("1.001")).is_err());
        assert!(validate_weight(dec("-0.001")).is_err());
    }

    /// Compartment codes are short uppercase labels fit for a printed QR tag
    #[test]
    fn test_compartment_code_format() {
        assert!(validate_compartment_code("A01-03").is_ok());
        assert!(validate_compartment_code("XY").is_ok());
        assert!(validate_compartment_code("DRAWER-12-LEFT").is_ok());

        assert!(validate_compartment_code("a01-03").is_err());
        assert!(validate_compartment_code("A").is_err());
        assert!(validate_compartment_code("A01 03").is_err());
        assert!(validate_compartment_code("A01-03-A01-03-A01").is_err());
    }

    /// Enums serialize to snake_case strings on the wire
    #[test]
    fn test_enum_wire_format() {
        assert_eq!(
            serde_json::to_string(&ItemType::MeasuringEquipment).unwrap(),
            "\"measuring_equipment\""
        );
        assert_eq!(
            serde_json::to_string(&Condition::Reground).unwrap(),
            "\"reground\""
        );
        assert_eq!(
            serde_json::to_string(&StockStatus::Warning).unwrap(),
            "\"warning\""
        );

        let parsed: Condition = serde_json::from_str("\"used\"").unwrap();
        assert_eq!(parsed, Condition::Used);
    }

    /// Text storage of item types round-trips through the closed set
    #[test]
    fn test_item_type_text_round_trip() {
        for item_type in [
            ItemType::Tool,
            ItemType::Insert,
            ItemType::Accessory,
            ItemType::MeasuringEquipment,
            ItemType::ClampingDevice,
        ] {
            assert_eq!(ItemType::from_str(item_type.as_str()), Some(item_type));
        }
        assert_eq!(ItemType::from_str("fixture"), None);
    }

    /// Pagination clamps runaway limits and negative offsets
    #[test]
    fn test_pagination_clamping() {
        let p = Pagination {
            limit: 10_000,
            offset: -5,
        }
        .clamped();
        assert_eq!(p.limit, 200);
        assert_eq!(p.offset, 0);

        let p = Pagination {
            limit: 0,
            offset: 30,
        }
        .clamped();
        assert_eq!(p.limit, 1);
        assert_eq!(p.offset, 30);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Weight validation accepts exactly the closed interval [0, 1]
    #[test]
    fn prop_weight_validation_matches_interval(numerator in -200i64..=200) {
        let weight = Decimal::new(numerator, 2);
        let in_range = weight >= Decimal::ZERO && weight <= Decimal::ONE;
        prop_assert_eq!(validate_weight(weight).is_ok(), in_range);
    }

    /// Codes built from the allowed alphabet at a legal length always pass
    #[test]
    fn prop_valid_codes_accepted(code in "[A-Z0-9-]{2,16}") {
        prop_assert!(validate_compartment_code(&code).is_ok());
    }

    /// Lowercase anywhere in the code is rejected
    #[test]
    fn prop_lowercase_codes_rejected(
        prefix in "[A-Z0-9]{1,6}",
        lower in "[a-z]{1,4}"
    ) {
        let code = format!("{}{}", prefix, lower);
        prop_assert!(validate_compartment_code(&code).is_err());
    }

    /// An item with exactly one matching reference is always consistent
    #[test]
    fn prop_single_matching_reference_consistent(type_index in 0usize..5) {
        let item_type = [
            ItemType::Tool,
            ItemType::Insert,
            ItemType::Accessory,
            ItemType::MeasuringEquipment,
            ItemType::ClampingDevice,
        ][type_index];

        let mut item = blank_item(item_type);
        match ItemClass::from(item_type) {
            ItemClass::ToolLike => item.tool_master_id = Some(uuid::Uuid::new_v4()),
            ItemClass::MeasuringEquipment => {
                item.measuring_equipment_id = Some(uuid::Uuid::new_v4())
            }
            ItemClass::ClampingDevice => item.clamping_device_id = Some(uuid::Uuid::new_v4()),
        }

        prop_assert!(item.entity_reference_consistent());
    }
}
