//! Tests for the in-memory store contract

use super::*;
use crate::Error;
use crate::app::services::history_store::{HistoryStore, InMemoryHistoryStore};
use crate::config::HistoryConfig;
use std::sync::Arc;
use std::thread;

fn unbounded_store() -> InMemoryHistoryStore {
    InMemoryHistoryStore::new(HistoryConfig::default().with_max_entries(0))
}

#[test]
fn test_empty_store() {
    let store = unbounded_store();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert!(store.list(5).is_empty());
    assert!(store.latest().is_none());
    assert!(store.latest_pair().is_none());
}

#[test]
fn test_append_assigns_increasing_ids() {
    let store = unbounded_store();
    let first = store.append(create_pending_summary(1.0)).unwrap();
    let second = store.append(create_pending_summary(2.0)).unwrap();
    let third = store.append(create_pending_summary(3.0)).unwrap();

    assert!(first.uploaded_at < second.uploaded_at);
    assert!(second.uploaded_at < third.uploaded_at);
    assert_eq!(store.len(), 3);
}

#[test]
fn test_list_is_newest_first_and_limited() {
    let store = unbounded_store();
    for pressure in [1.0, 2.0, 3.0] {
        store.append(create_pending_summary(pressure)).unwrap();
    }

    let listed: Vec<Option<f64>> = store.list(2).iter().map(|s| s.average_pressure).collect();
    assert_eq!(listed, vec![Some(3.0), Some(2.0)]);
    assert_eq!(store.list(10).len(), 3);
    assert!(store.list(0).is_empty());
}

#[test]
fn test_get_by_timestamp_and_id() {
    let store = unbounded_store();
    let stored = store.append(create_pending_summary(4.0)).unwrap();

    let by_time = store.get(&stored.uploaded_at).unwrap();
    assert!(Arc::ptr_eq(&by_time, &stored));

    let by_id = store.get_by_id(&stored.id()).unwrap();
    assert_eq!(by_id.uploaded_at, stored.uploaded_at);
}

#[test]
fn test_get_unknown_is_not_found() {
    let store = unbounded_store();
    store.append(create_pending_summary(4.0)).unwrap();

    let err = store.get_by_id("2001-01-01T00:00:00.000000Z").unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    let err = store.get_by_id("not-a-timestamp").unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn test_latest_pair() {
    let store = unbounded_store();
    store.append(create_pending_summary(1.0)).unwrap();
    assert!(store.latest_pair().is_none());

    store.append(create_pending_summary(2.0)).unwrap();
    let (latest, previous) = store.latest_pair().unwrap();
    assert_eq!(latest.average_pressure, Some(2.0));
    assert_eq!(previous.average_pressure, Some(1.0));
}

#[test]
fn test_concurrent_appends_get_distinct_ids() {
    let store = Arc::new(unbounded_store());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..25)
                    .map(|_| store.append(create_pending_summary(i as f64)).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .map(|s| s.uploaded_at)
        .collect();

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 200);
    assert_eq!(store.len(), 200);

    // Stored order matches identity order
    let listed: Vec<_> = store.list(200).iter().map(|s| s.uploaded_at).collect();
    assert!(listed.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_store_is_usable_as_trait_object() {
    let store: Arc<dyn HistoryStore> = Arc::new(unbounded_store());
    let stored = store.append(create_pending_summary(1.0)).unwrap();
    assert_eq!(store.latest().unwrap().uploaded_at, stored.uploaded_at);
}
