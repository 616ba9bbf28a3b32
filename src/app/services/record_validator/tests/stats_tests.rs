//! Tests for ingest statistics

use crate::app::models::RejectReason;
use crate::app::services::record_validator::IngestStats;

#[test]
fn test_ingest_stats_new() {
    let stats = IngestStats::new();

    assert_eq!(stats.total_rows, 0);
    assert_eq!(stats.valid_records, 0);
    assert_eq!(stats.rejected_rows, 0);
    assert!(stats.rejected_by_reason.is_empty());
    assert_eq!(stats, IngestStats::default());
}

#[test]
fn test_ingest_stats_counting() {
    let mut stats = IngestStats::new();
    stats.record_valid();
    stats.record_valid();
    stats.record_rejected(RejectReason::NotNumeric);
    stats.record_rejected(RejectReason::NotNumeric);
    stats.record_rejected(RejectReason::EmptyName);

    assert_eq!(stats.total_rows, 5);
    assert_eq!(stats.valid_records, 2);
    assert_eq!(stats.rejected_rows, 3);
    assert_eq!(stats.rejected_for(RejectReason::NotNumeric), 2);
    assert_eq!(stats.rejected_for(RejectReason::EmptyName), 1);
    assert_eq!(stats.rejected_for(RejectReason::MalformedRow), 0);
}

#[test]
fn test_ingest_stats_success_rate() {
    let mut stats = IngestStats::new();

    // Empty case
    assert_eq!(stats.success_rate(), 100.0);

    for _ in 0..9 {
        stats.record_valid();
    }
    stats.record_rejected(RejectReason::MissingField);
    assert_eq!(stats.success_rate(), 90.0);
    assert!(!stats.is_successful());

    stats.record_valid();
    assert!(stats.is_successful());
}

#[test]
fn test_ingest_stats_summary() {
    let mut stats = IngestStats::new();
    stats.record_valid();
    assert_eq!(stats.summary(), "Validated 1/1 rows (100.0% success)");

    stats.record_rejected(RejectReason::NotNumeric);
    stats.record_rejected(RejectReason::MissingField);
    assert_eq!(
        stats.summary(),
        "Validated 1/3 rows (33.3% success), rejected: 1 MISSING_FIELD, 1 NOT_NUMERIC"
    );
}
