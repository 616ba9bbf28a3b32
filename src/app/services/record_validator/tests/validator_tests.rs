//! Tests for row validation

use super::*;
use crate::Error;
use crate::app::models::RejectReason;
use crate::app::services::record_validator::RecordValidator;
use crate::config::IngestConfig;

#[test]
fn test_valid_row_becomes_trimmed_record() {
    let validator = RecordValidator::default();
    let row = create_raw_row(1, [" P-101 ", " Pump", "12.5", " 11.0", "80 "]);

    let record = validator.validate_row(&row).unwrap();
    assert_eq!(record.name, "P-101");
    assert_eq!(record.equipment_type, "Pump");
    assert_eq!(record.flowrate, 12.5);
    assert_eq!(record.pressure, 11.0);
    assert_eq!(record.temperature, 80.0);
}

#[test]
fn test_first_failing_column_decides_reason() {
    let validator = RecordValidator::default();

    let cases = [
        (["", "Pump", "x", "1", "1"], RejectReason::EmptyName, "name"),
        (["P-1", "", "x", "1", "1"], RejectReason::MissingField, "type"),
        (["P-1", "Pump", "x", "", "1"], RejectReason::NotNumeric, "flowrate"),
        (["P-1", "Pump", "1", "", "1"], RejectReason::MissingField, "pressure"),
        (["P-1", "Pump", "1", "2", "NaN"], RejectReason::NotNumeric, "temperature"),
    ];

    for (values, reason, column) in cases {
        let rejected = validator.validate_row(&create_raw_row(4, values)).unwrap_err();
        assert_eq!(rejected.reason, reason, "{:?}", values);
        assert_eq!(rejected.column.as_deref(), Some(column));
        assert_eq!(rejected.row_index, 4);
    }
}

#[test]
fn test_mixed_rows_keep_order_and_counts() {
    let validator = RecordValidator::default();
    let rows = vec![
        Ok(create_raw_row(1, ["P-101", "Pump", "12.5", "11.0", "80"])),
        Ok(create_raw_row(2, ["P-102", "Pump", "abc", "5.0", "60"])),
        Err(create_malformed_row(3)),
        Ok(create_raw_row(4, ["V-201", "Valve", "4.0", "3.0", "45"])),
    ];

    let result = validator.validate_rows(rows, "mixed.csv").unwrap();

    let names: Vec<&str> = result.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["P-101", "V-201"]);

    assert_eq!(result.rejected.len(), 2);
    assert_eq!(result.rejected[0].row_index, 2);
    assert_eq!(result.rejected[0].reason, RejectReason::NotNumeric);
    assert_eq!(result.rejected[1].row_index, 3);
    assert_eq!(result.rejected[1].reason, RejectReason::MalformedRow);
    assert!(result.rejected[1].column.is_none());

    assert_eq!(result.stats.total_rows, 4);
    assert_eq!(result.stats.valid_records, 2);
    assert_eq!(result.stats.rejected_rows, 2);
}

#[test]
fn test_all_rows_rejected_is_no_valid_records() {
    let validator = RecordValidator::default();
    let rows = vec![
        Err(create_malformed_row(1)),
        Ok(create_raw_row(2, ["", "Pump", "1", "2", "3"])),
    ];

    let err = validator.validate_rows(rows, "bad.csv").unwrap_err();
    match err {
        Error::NoValidRecords { file, rejected } => {
            assert_eq!(file, "bad.csv");
            assert_eq!(rejected, 2);
        }
        other => panic!("expected NoValidRecords, got {:?}", other),
    }
}

#[test]
fn test_strict_structure_aborts_on_malformed_row() {
    let validator = RecordValidator::from_config(&IngestConfig::default().with_strict_structure());
    let rows = vec![
        Ok(create_raw_row(1, ["P-101", "Pump", "12.5", "11.0", "80"])),
        Err(create_malformed_row(2)),
    ];

    let err = validator.validate_rows(rows, "strict.csv").unwrap_err();
    assert!(matches!(err, Error::MalformedRow { row_index: 2, .. }));
    assert!(err.is_structural());
}

#[test]
fn test_strict_structure_still_rejects_bad_values() {
    let validator = RecordValidator::new(true);
    let rows = vec![
        Ok(create_raw_row(1, ["P-101", "Pump", "12.5", "11.0", "80"])),
        Ok(create_raw_row(2, ["P-102", "Pump", "1,5", "11.0", "80"])),
    ];

    let result = validator.validate_rows(rows, "strict.csv").unwrap();
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.rejected[0].reason, RejectReason::NotNumeric);
}
