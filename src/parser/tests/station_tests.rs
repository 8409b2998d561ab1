//! Tests for the station file state machine

use super::*;
use crate::error::CtdError;
use crate::models::RawStationFile;
use crate::parser::StationParser;

fn parse(content: &str) -> crate::error::Result<crate::parser::ParsedStation> {
    StationParser::new().parse("test.csv", content)
}

#[test]
fn test_minimal_station_file() {
    let parsed = parse(&create_minimal_station_file()).unwrap();
    let station = parsed.station;

    assert_eq!(station.position.latitude, 12.34);
    assert_eq!(station.position.longitude, -65.0);
    assert_eq!(
        station.table.columns(),
        &["LATITUDE", "LONGITUDE", "CTDPRS", "CTDTMP", "CTDSAL"]
    );
    assert_eq!(station.row_count(), 2);
    assert_eq!(
        station.table.rows()[0].values(),
        &[Some(12.34), Some(-65.0), Some(10.0), Some(20.0), Some(35.0)]
    );
    assert_eq!(
        station.table.rows()[1].values(),
        &[Some(12.34), Some(-65.0), Some(20.0), Some(20.5), Some(35.1)]
    );
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_woce_station_file() {
    let parsed = parse(&create_woce_station_file()).unwrap();
    let table = &parsed.station.table;

    assert_eq!(parsed.station.position.latitude, 6.895);
    assert_eq!(parsed.station.position.longitude, -52.4283);
    assert_eq!(table.columns().len(), 10);
    // comment and blank lines between units row and END_DATA are skipped
    assert_eq!(table.len(), 4);
    assert_eq!(table.value(2, "CTDOXY"), None);
    assert_eq!(table.value(2, "CTDOXY_FLAG_W"), Some(9.0));
    assert_eq!(table.value(3, "CTDSAL"), Some(-999.0));
}

#[test]
fn test_row_count_matches_lines_between_units_and_terminator() {
    let content = create_woce_station_file();
    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    let header = lines.iter().position(|l| l.starts_with("CTDPRS")).unwrap();
    let end = lines.iter().position(|l| l.starts_with("END_DATA")).unwrap();
    let expected = lines[header + 2..end]
        .iter()
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .count();

    let parsed = parse(&content).unwrap();
    assert_eq!(parsed.station.row_count(), expected);
}

#[test]
fn test_units_row_skipped_even_if_numeric() {
    let content = "LATITUDE = 1.0\nLONGITUDE = 2.0\nCTDPRS,CTDTMP\n1.0,2.0\n3.0,4.0\nEND_DATA";
    let parsed = parse(content).unwrap();
    assert_eq!(parsed.station.row_count(), 1);
    assert_eq!(parsed.station.table.value(0, "CTDPRS"), Some(3.0));
}

#[test]
fn test_missing_latitude_is_malformed() {
    let content = "CTD,1\nLONGITUDE = -65.00,\nCTDPRS,CTDTMP,CTDSAL\nDBAR,ITS-90,PSS-78\n10.0,20.0,35.0\nEND_DATA";
    match parse(content).unwrap_err() {
        CtdError::MalformedStationFile { file, reason } => {
            assert_eq!(file, "test.csv");
            assert!(reason.contains("LATITUDE"));
        }
        other => panic!("Expected MalformedStationFile, got {:?}", other),
    }
}

#[test]
fn test_longitude_must_follow_latitude() {
    let content = "LATITUDE = 12.34,\nDEPTH = 100\nLONGITUDE = -65.00,\nCTDPRS\nDBAR\n1.0\nEND_DATA";
    let err = parse(content).unwrap_err();
    assert!(matches!(err, CtdError::MalformedStationFile { .. }));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_latitude_on_last_line_is_malformed() {
    let err = parse("CTD\nLATITUDE = 12.34,").unwrap_err();
    assert!(matches!(err, CtdError::MalformedStationFile { .. }));
}

#[test]
fn test_unparsable_position_is_malformed() {
    let err = parse("LATITUDE = north\nLONGITUDE = 1.0\n").unwrap_err();
    assert!(matches!(err, CtdError::MalformedStationFile { .. }));
}

#[test]
fn test_missing_header_is_malformed() {
    let err = parse("LATITUDE = 1.0\nLONGITUDE = 2.0\n10.0,20.0\nEND_DATA").unwrap_err();
    match err {
        CtdError::MalformedStationFile { reason, .. } => assert!(reason.contains("CTDPRS")),
        other => panic!("Expected MalformedStationFile, got {:?}", other),
    }
}

#[test]
fn test_arity_mismatch_is_malformed() {
    let content = "LATITUDE = 1.0\nLONGITUDE = 2.0\nCTDPRS,CTDTMP,CTDSAL\nDBAR,ITS-90,PSS-78\n10.0,20.0,35.0\n10.0,20.0\nEND_DATA";
    match parse(content).unwrap_err() {
        CtdError::MalformedStationFile { reason, .. } => {
            assert!(reason.contains("line 6"));
            assert!(reason.contains("2 fields"));
        }
        other => panic!("Expected MalformedStationFile, got {:?}", other),
    }
}

#[test]
fn test_non_numeric_field_is_malformed() {
    let content = "LATITUDE = 1.0\nLONGITUDE = 2.0\nCTDPRS,CTDTMP\nDBAR,DEG\n10.0,warm\nEND_DATA";
    assert!(matches!(
        parse(content).unwrap_err(),
        CtdError::MalformedStationFile { .. }
    ));
}

#[test]
fn test_empty_fields_are_null() {
    let content = "LATITUDE = 1.0\nLONGITUDE = 2.0\nCTDPRS,CTDTMP,CTDSAL\nDBAR,DEG,PSS\n10.0,,35.0\nEND_DATA";
    let parsed = parse(content).unwrap();
    assert_eq!(
        parsed.station.table.rows()[0].values(),
        &[Some(1.0), Some(2.0), Some(10.0), None, Some(35.0)]
    );
}

#[test]
fn test_lines_after_terminator_ignored() {
    let content = "LATITUDE = 1.0\nLONGITUDE = 2.0\nCTDPRS\nDBAR\n5.0\nEND_DATA\n6.0,7.0,8.0\nnot,a,number";
    let parsed = parse(content).unwrap();
    assert_eq!(parsed.station.row_count(), 1);
}

#[test]
fn test_missing_terminator_is_a_warning() {
    let content = "LATITUDE = 1.0\nLONGITUDE = 2.0\nCTDPRS\nDBAR\n5.0\n6.0";
    let parsed = parse(content).unwrap();
    assert_eq!(parsed.station.row_count(), 2);
    assert_eq!(parsed.warnings.len(), 1);
    assert!(parsed.warnings[0].contains("END_DATA"));
}

#[test]
fn test_header_without_data_yields_empty_table() {
    let content = "LATITUDE = 1.0\nLONGITUDE = 2.0\nCTDPRS,CTDTMP\nDBAR,DEG\nEND_DATA";
    let parsed = parse(content).unwrap();
    assert_eq!(parsed.station.row_count(), 0);
}

#[test]
fn test_parse_file_uses_identifier() {
    let file = RawStationFile::new("cruise.zip:st001_ct1.csv", create_minimal_station_file());
    let parsed = StationParser::new().parse_file(&file).unwrap();
    assert_eq!(parsed.station.source, "cruise.zip:st001_ct1.csv");
    assert_eq!(parsed.station.table.name(), "cruise.zip:st001_ct1.csv");
}

#[test]
fn test_crlf_line_endings() {
    let content = create_minimal_station_file().replace('\n', "\r\n");
    let parsed = parse(&content).unwrap();
    assert_eq!(parsed.station.row_count(), 2);
}
