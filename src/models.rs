//! Core data structures for CTD processing.
//!
//! Defines station positions, measurement tables produced by the station
//! parser, and the aggregated and derived records handed between pipeline
//! stages.

use crate::constants::{LATITUDE, LONGITUDE};
use crate::error::{CtdError, Result};
use serde::Serialize;

/// Position of a CTD station, taken from the file's metadata block
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl StationPosition {
    /// Create a position, rejecting non-finite coordinates
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        (latitude.is_finite() && longitude.is_finite()).then_some(Self {
            latitude,
            longitude,
        })
    }
}

/// One row of a measurement table, aligned to the table's column list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementRow {
    values: Vec<Option<f64>>,
}

impl MeasurementRow {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Named table of nullable numeric columns
///
/// Column names are resolved once when the table is created and every row
/// pushed afterwards must match their count.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<MeasurementRow>,
}

impl MeasurementTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Value of `column` in row `row`, `None` when null or absent
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// Append a row, enforcing the header arity
    pub fn push_row(&mut self, row: MeasurementRow) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(CtdError::malformed(
                &self.name,
                format!(
                    "row has {} fields but header has {}",
                    row.len(),
                    self.columns.len()
                ),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Keep the listed columns that exist in this table, in the given order
    ///
    /// Returns `None` when none of them is present.
    pub fn select_available(&self, columns: &[&str]) -> Option<MeasurementTable> {
        let picked: Vec<(String, usize)> = columns
            .iter()
            .filter_map(|name| self.column_index(name).map(|i| (name.to_string(), i)))
            .collect();

        if picked.is_empty() {
            return None;
        }

        let rows = self
            .rows
            .iter()
            .map(|row| MeasurementRow::new(picked.iter().map(|(_, i)| row.get(*i)).collect()))
            .collect();

        Some(MeasurementTable {
            name: self.name.clone(),
            columns: picked.into_iter().map(|(name, _)| name).collect(),
            rows,
        })
    }

    /// Drop rows whose values are all null outside the position columns
    ///
    /// Returns the number of rows removed.
    pub fn retain_rows_with_measurements(&mut self) -> usize {
        let measurement_indices: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() != LATITUDE && c.as_str() != LONGITUDE)
            .map(|(i, _)| i)
            .collect();

        let before = self.rows.len();
        self.rows
            .retain(|row| measurement_indices.iter().any(|&i| row.get(i).is_some()));
        before - self.rows.len()
    }

    /// Stack `tables` into one table over the union of their column sets
    ///
    /// `column_order` fixes the output order of the union; a table that
    /// lacks a column contributes nulls for it.
    pub fn concat(
        name: impl Into<String>,
        tables: Vec<MeasurementTable>,
        column_order: &[&str],
    ) -> MeasurementTable {
        let columns: Vec<String> = column_order
            .iter()
            .filter(|c| tables.iter().any(|t| t.has_column(c)))
            .map(|c| c.to_string())
            .collect();

        let mut rows = Vec::with_capacity(tables.iter().map(MeasurementTable::len).sum());
        for table in &tables {
            let mapping: Vec<Option<usize>> =
                columns.iter().map(|c| table.column_index(c)).collect();
            for row in &table.rows {
                rows.push(MeasurementRow::new(
                    mapping.iter().map(|i| i.and_then(|i| row.get(i))).collect(),
                ));
            }
        }

        MeasurementTable {
            name: name.into(),
            columns,
            rows,
        }
    }
}

/// Parsed contents of one station file
#[derive(Debug, Clone, PartialEq)]
pub struct StationTable {
    pub source: String,
    pub position: StationPosition,
    pub table: MeasurementTable,
}

impl StationTable {
    pub fn row_count(&self) -> usize {
        self.table.len()
    }
}

/// One row per unique latitude after aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRecord {
    pub latitude: f64,
    pub longitude: Option<f64>,
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
    pub salinity: Option<f64>,
}

impl AggregatedRecord {
    /// Values in canonical column order
    pub fn values(&self) -> [Option<f64>; 5] {
        [
            Some(self.latitude),
            self.longitude,
            self.pressure,
            self.temperature,
            self.salinity,
        ]
    }
}

/// Aggregated record whose required fields are present and not sentinels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub pressure: f64,
    pub temperature: f64,
    pub salinity: f64,
}

/// Valid record extended with the derived seawater properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedRecord {
    pub record: ValidRecord,
    pub depth_m: f64,
    pub absolute_salinity: f64,
    pub conservative_temperature: f64,
    pub sound_speed: f64,
}

impl DerivedRecord {
    /// Values in output column order
    pub fn values(&self) -> [f64; 9] {
        [
            self.record.latitude,
            self.record.longitude,
            self.record.pressure,
            self.record.temperature,
            self.record.salinity,
            self.depth_m,
            self.absolute_salinity,
            self.conservative_temperature,
            self.sound_speed,
        ]
    }
}

/// Row excluded from the derived output, kept for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivationFailure {
    pub latitude: f64,
    pub longitude: f64,
    pub reason: String,
}

/// Raw text of one station file plus its identifier
#[derive(Debug, Clone, PartialEq)]
pub struct RawStationFile {
    pub id: String,
    pub content: String,
}

impl RawStationFile {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}
