//! Tests for eviction and equipment retention

use super::*;
use crate::app::services::history_store::{HistoryStore, InMemoryHistoryStore};
use crate::config::{EquipmentRetention, HistoryConfig};

#[test]
fn test_default_keeps_last_five() {
    let store = InMemoryHistoryStore::new(HistoryConfig::default());
    let mut stored = Vec::new();
    for i in 0..7 {
        stored.push(store.append(create_pending_summary(i as f64)).unwrap());
    }

    assert_eq!(store.len(), 5);
    assert!(store.get(&stored[0].uploaded_at).is_err());
    assert!(store.get(&stored[1].uploaded_at).is_err());
    assert!(store.get(&stored[2].uploaded_at).is_ok());
    assert_eq!(store.latest().unwrap().average_pressure, Some(6.0));
}

#[test]
fn test_two_entries_always_survive_for_trends() {
    let store = InMemoryHistoryStore::new(HistoryConfig::default().with_max_entries(2));
    for i in 0..4 {
        store.append(create_pending_summary(i as f64)).unwrap();
    }

    let (latest, previous) = store.latest_pair().unwrap();
    assert_eq!(latest.average_pressure, Some(3.0));
    assert_eq!(previous.average_pressure, Some(2.0));
}

#[test]
fn test_cap_below_two_still_keeps_a_trend_pair() {
    let store = InMemoryHistoryStore::new(HistoryConfig::default().with_max_entries(1));
    for i in 0..3 {
        store.append(create_pending_summary(i as f64)).unwrap();
    }

    assert_eq!(store.len(), 2);
    let (latest, previous) = store.latest_pair().unwrap();
    assert_eq!(latest.average_pressure, Some(2.0));
    assert_eq!(previous.average_pressure, Some(1.0));

    let restored =
        InMemoryHistoryStore::from_snapshot(HistoryConfig::default().with_max_entries(1), store.snapshot())
            .unwrap();
    assert_eq!(restored.len(), 2);
}

#[test]
fn test_latest_only_equipment_retention() {
    let store = InMemoryHistoryStore::new(HistoryConfig::default());
    let first = store.append(create_pending_summary(1.0)).unwrap();
    assert!(first.equipment.is_some());

    store.append(create_pending_summary(2.0)).unwrap();

    let listed = store.list(2);
    assert!(listed[0].equipment.is_some());
    assert!(listed[1].equipment.is_none());
    // Everything but the equipment list is unchanged
    assert_eq!(listed[1].uploaded_at, first.uploaded_at);
    assert_eq!(listed[1].total_equipment, first.total_equipment);
    // Readers holding the earlier Arc keep what they were given
    assert!(first.equipment.is_some());
}

#[test]
fn test_all_equipment_retention() {
    let config = HistoryConfig::default().with_equipment_retention(EquipmentRetention::All);
    let store = InMemoryHistoryStore::new(config);
    for i in 0..3 {
        store.append(create_pending_summary(i as f64)).unwrap();
    }

    assert!(store.list(3).iter().all(|s| s.equipment.is_some()));
}

#[test]
fn test_no_equipment_retention() {
    let config = HistoryConfig::default().with_equipment_retention(EquipmentRetention::None);
    let store = InMemoryHistoryStore::new(config);
    let stored = store.append(create_pending_summary(1.0)).unwrap();

    assert!(stored.equipment.is_none());
    assert_eq!(stored.total_equipment, 1);
}
