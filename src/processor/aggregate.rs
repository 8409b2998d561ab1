//! Merge processed tables into one record per latitude
//!
//! Rows from all tables are pooled in input order and grouped on the exact
//! `LATITUDE` value. Each group keeps the first row's `LONGITUDE` and the
//! mean of each measurement column, ignoring nulls.

use super::report::AggregationReport;
use crate::constants::{CANONICAL_COLUMNS, LATITUDE};
use crate::error::CtdError;
use crate::models::{AggregatedRecord, MeasurementTable};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Aggregated records plus what was skipped on the way
#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    pub records: Vec<AggregatedRecord>,
    pub report: AggregationReport,
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| !v.is_nan()) {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug)]
struct Group {
    latitude: f64,
    longitude: Option<f64>,
    measurements: [Mean; 3],
}

/// Grouping key with `-0.0` and `0.0` folded together
fn latitude_key(latitude: f64) -> u64 {
    if latitude == 0.0 {
        0.0f64.to_bits()
    } else {
        latitude.to_bits()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RecordAggregator;

impl RecordAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate all tables into one record per unique latitude
    ///
    /// Output order is the order latitudes are first seen. A table missing
    /// a canonical column contributes nothing and is reported.
    pub fn aggregate(&self, tables: Vec<MeasurementTable>) -> AggregationOutcome {
        let mut report = AggregationReport::default();
        let mut groups: Vec<Group> = Vec::new();
        let mut index: HashMap<u64, usize> = HashMap::new();

        for table in &tables {
            report.tables_read += 1;

            let columns: Option<Vec<usize>> = CANONICAL_COLUMNS
                .iter()
                .map(|c| table.column_index(c))
                .collect();
            let Some(columns) = columns else {
                let missing = CANONICAL_COLUMNS
                    .iter()
                    .find(|c| !table.has_column(c))
                    .copied()
                    .unwrap_or(LATITUDE);
                let err = CtdError::incomplete_table(table.name(), missing);
                warn!("{}", err);
                report.tables_skipped += 1;
                report.warn(err.to_string());
                continue;
            };

            let (lat, lon, measured) = (columns[0], columns[1], &columns[2..]);
            for row in table.rows() {
                report.rows_pooled += 1;

                let Some(latitude) = row.get(lat).filter(|v| !v.is_nan()) else {
                    report.rows_without_latitude += 1;
                    continue;
                };

                let slot = *index.entry(latitude_key(latitude)).or_insert_with(|| {
                    groups.push(Group {
                        latitude,
                        longitude: row.get(lon),
                        measurements: [Mean::default(); 3],
                    });
                    groups.len() - 1
                });

                let group = &mut groups[slot];
                for (mean, &column) in group.measurements.iter_mut().zip(measured) {
                    mean.add(row.get(column));
                }
            }
        }

        if report.rows_without_latitude > 0 {
            report.warn(format!(
                "{} rows without {} were skipped",
                report.rows_without_latitude, LATITUDE
            ));
        }

        let records: Vec<AggregatedRecord> = groups
            .into_iter()
            .map(|g| {
                let [pressure, temperature, salinity] = g.measurements.map(|m| m.value());
                AggregatedRecord {
                    latitude: g.latitude,
                    longitude: g.longitude,
                    pressure,
                    temperature,
                    salinity,
                }
            })
            .collect();

        report.records = records.len();
        debug!(
            "Aggregated {} rows into {} records",
            report.rows_pooled,
            records.len()
        );

        AggregationOutcome { records, report }
    }
}
