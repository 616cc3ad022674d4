//! Validation utilities for the Tool Crib Management Platform

use rust_decimal::Decimal;

use crate::models::{ItemType, StorageItem};

/// Validate a condition weight is within [0, 1]
pub fn validate_weight(weight: Decimal) -> Result<(), &'static str> {
    if weight < Decimal::ZERO || weight > Decimal::ONE {
        return Err("Condition weight must be between 0.0 and 1.0");
    }
    Ok(())
}

/// Validate an operation quantity is strictly positive
pub fn validate_operation_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate an absolute quantity (inventory correction target) is non-negative
pub fn validate_absolute_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate a compartment code (2-16 uppercase alphanumerics, dash allowed)
pub fn validate_compartment_code(code: &str) -> Result<(), &'static str> {
    let len_ok = (2..=16).contains(&code.len());
    let chars_ok = code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-');
    if len_ok && chars_ok {
        Ok(())
    } else {
        Err("Compartment code must be 2-16 uppercase alphanumeric characters")
    }
}

/// Validate the mutually-exclusive entity reference of a storage item
pub fn validate_entity_reference(item: &StorageItem) -> Result<(), &'static str> {
    if item.entity_reference_consistent() {
        Ok(())
    } else {
        Err("Exactly one entity reference matching the item type must be set")
    }
}

/// Which entity reference column an item type requires
pub fn required_reference(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Tool | ItemType::Insert | ItemType::Accessory => "tool_master_id",
        ItemType::MeasuringEquipment => "measuring_equipment_id",
        ItemType::ClampingDevice => "clamping_device_id",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_weight_range() {
        assert!(validate_weight(Decimal::ZERO).is_ok());
        assert!(validate_weight(Decimal::ONE).is_ok());
        assert!(validate_weight(dec("0.5")).is_ok());
        assert!(validate_weight(dec("1.01")).is_err());
        assert!(validate_weight(dec("-0.1")).is_err());
    }

    #[test]
    fn test_validate_operation_quantity() {
        assert!(validate_operation_quantity(dec("1")).is_ok());
        assert!(validate_operation_quantity(Decimal::ZERO).is_err());
        assert!(validate_operation_quantity(dec("-3")).is_err());
    }

    #[test]
    fn test_validate_absolute_quantity() {
        assert!(validate_absolute_quantity(Decimal::ZERO).is_ok());
        assert!(validate_absolute_quantity(dec("2.5")).is_ok());
        assert!(validate_absolute_quantity(dec("-0.01")).is_err());
    }

    #[test]
    fn test_validate_compartment_code() {
        assert!(validate_compartment_code("A01-03").is_ok());
        assert!(validate_compartment_code("B2").is_ok());
        assert!(validate_compartment_code("a01").is_err());
        assert!(validate_compartment_code("X").is_err());
        assert!(validate_compartment_code("A 1").is_err());
    }
}
