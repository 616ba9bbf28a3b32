//! Tests for the history store module

pub mod retention_tests;
pub mod store_tests;

// Test helper functions and fixtures
use crate::app::models::{EquipmentRecord, PendingSummary};
use std::collections::BTreeMap;

/// Create a pending summary with one pump at the given pressure
pub fn create_pending_summary(pressure: f64) -> PendingSummary {
    let record = EquipmentRecord::new("P-101", "Pump", 12.5, pressure, 80.0).unwrap();

    let mut distribution = BTreeMap::new();
    distribution.insert("Pump".to_string(), 1);

    PendingSummary {
        filename: Some("plant.csv".to_string()),
        total_equipment: 1,
        average_flowrate: Some(12.5),
        average_pressure: Some(pressure),
        average_temperature: Some(80.0),
        equipment_type_distribution: distribution,
        validation_warnings: Vec::new(),
        rejected_rows: 0,
        equipment: Some(vec![record]),
    }
}
