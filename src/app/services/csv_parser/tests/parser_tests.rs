//! Tests for the main CSV parser functionality

use super::*;
use crate::Error;
use crate::app::services::csv_parser::sniff_delimiter;

#[test]
fn test_parse_export_header_file() {
    let rows = parse_all(&create_export_csv());

    assert_eq!(rows.len(), 3);
    let first = rows[0].as_ref().unwrap();
    assert_eq!(first.row_index, 1);
    assert_eq!(first.get("name"), Some("P-101"));
    assert_eq!(first.get("type"), Some("Pump"));
    assert_eq!(first.get("flowrate"), Some("12.5"));
    assert_eq!(first.get("pressure"), Some("11.0"));
    assert_eq!(first.get("temperature"), Some("80"));

    let last = rows[2].as_ref().unwrap();
    assert_eq!(last.row_index, 3);
    assert_eq!(last.get("type"), Some("Valve"));
}

#[test]
fn test_values_are_left_untrimmed_for_the_validator() {
    let rows = parse_all("name,type,flowrate,pressure,temperature\n  P-1 , Pump ,1,2,3\n");
    let row = rows[0].as_ref().unwrap();
    assert_eq!(row.get("name"), Some("  P-1 "));
    assert_eq!(row.get("type"), Some(" Pump "));
}

#[test]
fn test_empty_input_fails_fast() {
    let parser = CsvParser::new(IngestConfig::default());

    for content in ["", "   \n\n  "] {
        let err = parser.parse(content.as_bytes(), "empty.csv").err().unwrap();
        assert!(matches!(err, Error::EmptyFile { .. }), "{:?}", err);
    }
}

#[test]
fn test_header_only_fails_fast() {
    let parser = CsvParser::new(IngestConfig::default());
    let content = format!("{}\n\n", EXPORT_HEADER);

    let err = parser.parse(content.as_bytes(), "header.csv").err().unwrap();
    match err {
        Error::EmptyFile { file, reason } => {
            assert_eq!(file, "header.csv");
            assert!(reason.contains("no data rows"));
        }
        other => panic!("expected EmptyFile, got {:?}", other),
    }
}

#[test]
fn test_missing_columns_reported_by_name() {
    let parser = CsvParser::new(IngestConfig::default());
    let content = "name,type,flowrate\nP-1,Pump,3.0\n";

    let err = parser.parse(content.as_bytes(), "partial.csv").err().unwrap();
    match err {
        Error::HeaderMissing { missing, .. } => {
            assert_eq!(missing, vec!["pressure".to_string(), "temperature".to_string()]);
        }
        other => panic!("expected HeaderMissing, got {:?}", other),
    }
}

#[test]
fn test_short_row_is_yielded_as_malformed_and_parsing_continues() {
    let content = "name,type,flowrate,pressure,temperature\nP-1,Pump,1\nP-2,Pump,1,2,3\n";
    let rows = parse_all(content);

    assert_eq!(rows.len(), 2);
    let bad = rows[0].as_ref().unwrap_err();
    assert_eq!(bad.row_index, 1);
    assert_eq!(bad.message, "3 field(s), expected 5");
    assert_eq!(bad.raw_fields.get("name").map(String::as_str), Some("P-1"));

    assert!(rows[1].is_ok());
}

#[test]
fn test_overlong_row_is_malformed_but_trailing_delimiter_is_not() {
    let content =
        "name,type,flowrate,pressure,temperature\nP-1,Pump,1,2,3,\nP-2,Pump,1,2,3,extra\n";
    let rows = parse_all(content);

    assert!(rows[0].is_ok());
    assert!(rows[1].is_err());
}

#[test]
fn test_blank_lines_are_skipped_without_consuming_indexes() {
    let content = "name,type,flowrate,pressure,temperature\n\nP-1,Pump,1,2,3\n\n\nP-2,Pump,4,5,6\n";
    let rows = parse_all(content);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].as_ref().unwrap().row_index, 1);
    assert_eq!(rows[1].as_ref().unwrap().row_index, 2);
}

#[test]
fn test_semicolon_file_is_sniffed() {
    let content = "Name;Type;Flowrate;Pressure;Temperature\nP-1;Pump;1,5;2;3\n";
    let rows = parse_all(content);

    let row = rows[0].as_ref().unwrap();
    assert_eq!(row.get("name"), Some("P-1"));
    // A decimal comma stays inside the field; the validator rejects it
    assert_eq!(row.get("flowrate"), Some("1,5"));
}

#[test]
fn test_tab_separated_file_is_sniffed() {
    let content = "name\ttype\tflowrate\tpressure\ttemperature\nP-1\tPump\t1\t2\t3\n";
    let rows = parse_all(content);
    assert_eq!(rows[0].as_ref().unwrap().get("temperature"), Some("3"));
}

#[test]
fn test_configured_delimiter_wins_over_sniffing() {
    let parser = CsvParser::new(IngestConfig::default().with_delimiter('|'));
    // Header has more commas than pipes, so sniffing alone would pick a comma
    let content = "a,b,c,d,e,f,g|name|type|flowrate|pressure|temperature\nx,y|P-1|Pump|1|2|3\n";

    let rows: Vec<_> = parser.parse(content.as_bytes(), "pipe.csv").unwrap().collect();
    let row = rows[0].as_ref().unwrap();
    assert_eq!(row.get("name"), Some("P-1"));
    assert_eq!(row.get("a,b,c,d,e,f,g"), Some("x,y"));
}

#[test]
fn test_byte_order_mark_is_ignored() {
    let content = format!("\u{feff}{}", create_export_csv());
    let rows = parse_all(&content);
    assert_eq!(rows[0].as_ref().unwrap().get("name"), Some("P-101"));
}

#[test]
fn test_quoted_fields_keep_embedded_delimiters() {
    let content = "name,type,flowrate,pressure,temperature\n\"Pump, north\",Pump,1,2,3\n";
    let rows = parse_all(content);
    assert_eq!(rows[0].as_ref().unwrap().get("name"), Some("Pump, north"));
}

#[test]
fn test_invalid_utf8_row_is_malformed() {
    let mut bytes = b"name,type,flowrate,pressure,temperature\n".to_vec();
    bytes.extend_from_slice(b"P-\xff,Pump,1,2,3\nP-2,Pump,1,2,3\n");

    let rows: Vec<_> = CsvParser::default()
        .parse(&bytes, "latin1.csv")
        .unwrap()
        .collect();

    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_err());
    assert!(rows[1].is_ok());
}

#[test]
fn test_sniff_delimiter() {
    assert_eq!(sniff_delimiter(b"a,b,c\n1,2,3"), b',');
    assert_eq!(sniff_delimiter(b"a;b;c\n1;2;3"), b';');
    assert_eq!(sniff_delimiter(b"a\tb\tc"), b'\t');
    assert_eq!(sniff_delimiter(b"a|b|c"), b'|');
    assert_eq!(sniff_delimiter(b"\"a;b\",c,d"), b',');
    assert_eq!(sniff_delimiter(b"single"), b',');
}
