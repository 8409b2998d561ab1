//! Delimited table I/O
//!
//! Every table the pipeline hands between stages is comma separated with a
//! single header row. Nulls are empty fields and floats are written in the
//! shortest form that parses back to the same value, so a written table
//! reads back bit-for-bit.

use crate::constants::{CANONICAL_COLUMNS, LATITUDE, LONGITUDE, PRESSURE, SALINITY, TEMPERATURE};
use crate::constants::derived;
use crate::error::{CtdError, Result};
use crate::models::{
    AggregatedRecord, DerivationFailure, DerivedRecord, MeasurementRow, MeasurementTable,
};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Format a float so that `str::parse::<f64>` reproduces it exactly
pub fn format_value(value: f64) -> String {
    value.to_string()
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_default()
}

fn table_name(path: &Path) -> String {
    path.display().to_string()
}

/// Write a measurement table with its own column list as header
pub fn write_measurement_table<W: Write>(writer: W, table: &MeasurementTable) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(table.columns())?;
    for row in table.rows() {
        csv_writer.write_record(row.values().iter().map(|v| format_optional(*v)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_measurement_table_to_path(path: &Path, table: &MeasurementTable) -> Result<()> {
    debug!("Writing {} rows to {}", table.len(), path.display());
    write_measurement_table(File::create(path)?, table)
}

/// Read any header-plus-numeric-rows table
///
/// Cells are whitespace-trimmed; an empty cell is null and anything else
/// must parse as `f64`.
pub fn read_measurement_table<R: Read>(name: &str, reader: R) -> Result<MeasurementTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let mut table = MeasurementTable::new(name, columns);

    let mut record = StringRecord::new();
    while csv_reader.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row = parse_record(name, line, &record, table.columns())?;
        table.push_row(row)?;
    }

    debug!("Read {} rows from {}", table.len(), name);
    Ok(table)
}

pub fn read_measurement_table_from_path(path: &Path) -> Result<MeasurementTable> {
    read_measurement_table(&table_name(path), File::open(path)?)
}

fn parse_record(
    table: &str,
    line: u64,
    record: &StringRecord,
    columns: &[String],
) -> Result<MeasurementRow> {
    let values = record
        .iter()
        .zip(columns)
        .map(|(cell, column)| {
            if cell.is_empty() {
                Ok(None)
            } else {
                cell.parse::<f64>()
                    .map(Some)
                    .map_err(|_| CtdError::InvalidNumber {
                        table: table.to_string(),
                        line,
                        column: column.clone(),
                        value: cell.to_string(),
                    })
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MeasurementRow::new(values))
}

/// Write aggregated records under the canonical header
pub fn write_aggregated<W: Write>(writer: W, records: &[AggregatedRecord]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(CANONICAL_COLUMNS)?;
    for record in records {
        csv_writer.write_record(record.values().iter().map(|v| format_optional(*v)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_aggregated_to_path(path: &Path, records: &[AggregatedRecord]) -> Result<()> {
    debug!("Writing {} aggregated records to {}", records.len(), path.display());
    write_aggregated(File::create(path)?, records)
}

/// Read an aggregated table back into records
///
/// All five canonical columns must be present, in any order. A row without
/// a latitude cannot be an aggregated record and fails the read.
pub fn read_aggregated<R: Read>(name: &str, reader: R) -> Result<Vec<AggregatedRecord>> {
    let table = read_measurement_table(name, reader)?;

    let index = |column: &str| {
        table
            .column_index(column)
            .ok_or_else(|| CtdError::incomplete_table(name, column))
    };
    let lat = index(LATITUDE)?;
    let lon = index(LONGITUDE)?;
    let prs = index(PRESSURE)?;
    let tmp = index(TEMPERATURE)?;
    let sal = index(SALINITY)?;

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let latitude = row.get(lat).ok_or_else(|| CtdError::InvalidNumber {
                table: name.to_string(),
                line: i as u64 + 2,
                column: LATITUDE.to_string(),
                value: String::new(),
            })?;
            Ok(AggregatedRecord {
                latitude,
                longitude: row.get(lon),
                pressure: row.get(prs),
                temperature: row.get(tmp),
                salinity: row.get(sal),
            })
        })
        .collect()
}

pub fn read_aggregated_from_path(path: &Path) -> Result<Vec<AggregatedRecord>> {
    read_aggregated(&table_name(path), File::open(path)?)
}

/// Write derived records: canonical columns followed by the derived ones
pub fn write_derived<W: Write>(writer: W, records: &[DerivedRecord]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(CANONICAL_COLUMNS.iter().chain(derived::COLUMNS))?;
    for record in records {
        csv_writer.write_record(record.values().iter().map(|v| format_value(*v)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_derived_to_path(path: &Path, records: &[DerivedRecord]) -> Result<()> {
    debug!("Writing {} derived records to {}", records.len(), path.display());
    write_derived(File::create(path)?, records)
}

pub fn write_failures<W: Write>(writer: W, failures: &[DerivationFailure]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record([LATITUDE, LONGITUDE, "reason"])?;
    for failure in failures {
        csv_writer.write_record([
            format_value(failure.latitude),
            format_value(failure.longitude),
            failure.reason.clone(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_failures_to_path(path: &Path, failures: &[DerivationFailure]) -> Result<()> {
    write_failures(File::create(path)?, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidRecord;
    use tempfile::TempDir;

    fn records() -> Vec<AggregatedRecord> {
        vec![
            AggregatedRecord {
                latitude: 12.34,
                longitude: Some(-65.0),
                pressure: Some(15.0),
                temperature: Some(20.25),
                salinity: None,
            },
            AggregatedRecord {
                latitude: -0.1,
                longitude: None,
                pressure: Some(1.0 / 3.0),
                temperature: Some(-999.0),
                salinity: Some(34.999_999_999_999_99),
            },
        ]
    }

    #[test]
    fn test_aggregated_write_then_read_preserves_values_and_nulls() {
        let original = records();
        let mut buffer = Vec::new();
        write_aggregated(&mut buffer, &original).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("LATITUDE,LONGITUDE,CTDPRS,CTDTMP,CTDSAL\n"));
        assert!(text.contains("12.34,-65,15,20.25,\n"));

        let read_back = read_aggregated("mem", buffer.as_slice()).unwrap();
        assert_eq!(read_back.len(), original.len());
        for (a, b) in original.iter().zip(&read_back) {
            for (x, y) in a.values().iter().zip(b.values().iter()) {
                assert_eq!(x.map(f64::to_bits), y.map(f64::to_bits));
            }
        }
    }

    #[test]
    fn test_read_trims_whitespace() {
        let input = "LATITUDE, LONGITUDE ,CTDPRS,CTDTMP,CTDSAL\n 1.5 , 2 ,  ,3,4\n";
        let records = read_aggregated("mem", input.as_bytes()).unwrap();
        assert_eq!(records[0].latitude, 1.5);
        assert_eq!(records[0].longitude, Some(2.0));
        assert_eq!(records[0].pressure, None);
    }

    #[test]
    fn test_missing_column_is_incomplete_table() {
        let input = "LATITUDE,LONGITUDE,CTDPRS,CTDTMP\n1,2,3,4\n";
        match read_aggregated("agg.csv", input.as_bytes()).unwrap_err() {
            CtdError::IncompleteTable { table, missing } => {
                assert_eq!(table, "agg.csv");
                assert_eq!(missing, "CTDSAL");
            }
            other => panic!("Expected IncompleteTable, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_cell_reports_position() {
        let input = "LATITUDE,CTDPRS\n1,2\n3,deep\n";
        match read_measurement_table("t.csv", input.as_bytes()).unwrap_err() {
            CtdError::InvalidNumber {
                line,
                column,
                value,
                ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "CTDPRS");
                assert_eq!(value, "deep");
            }
            other => panic!("Expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_measurement_table_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cruise_processed.csv");

        let mut table = MeasurementTable::new(
            "cruise",
            vec!["LATITUDE".into(), "LONGITUDE".into(), "CTDPRS".into()],
        );
        table
            .push_row(MeasurementRow::new(vec![Some(6.895), Some(-52.4283), None]))
            .unwrap();
        write_measurement_table_to_path(&path, &table).unwrap();

        let read_back = read_measurement_table_from_path(&path).unwrap();
        assert_eq!(read_back.columns(), table.columns());
        assert_eq!(read_back.rows(), table.rows());
        assert_eq!(read_back.name(), path.display().to_string());
    }

    #[test]
    fn test_derived_and_failure_headers() {
        let derived = DerivedRecord {
            record: ValidRecord {
                latitude: 1.0,
                longitude: 2.0,
                pressure: 3.0,
                temperature: 4.0,
                salinity: 35.0,
            },
            depth_m: 2.98,
            absolute_salinity: 35.16504,
            conservative_temperature: 3.99,
            sound_speed: 1466.0,
        };
        let mut buffer = Vec::new();
        write_derived(&mut buffer, &[derived]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "LATITUDE,LONGITUDE,CTDPRS,CTDTMP,CTDSAL,depth_m,SA,CT,sound_speed"
        );
        assert_eq!(text.lines().nth(1).unwrap(), "1,2,3,4,35,2.98,35.16504,3.99,1466");

        let mut buffer = Vec::new();
        write_failures(
            &mut buffer,
            &[DerivationFailure {
                latitude: 1.0,
                longitude: 2.0,
                reason: "salinity 50 outside valid range [0, 42]".into(),
            }],
        )
        .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("LATITUDE,LONGITUDE,reason\n"));
        assert!(text.contains("\"salinity 50 outside valid range [0, 42]\""));
    }
}
