//! Validity filter ahead of derivation
//!
//! The only place exchange-format sentinels are interpreted. Records that
//! survive come out as [`ValidRecord`] with every required field present.

use crate::constants::is_sentinel;
use crate::models::{AggregatedRecord, ValidRecord};
use tracing::debug;

/// Records that passed plus the number dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub records: Vec<ValidRecord>,
    pub dropped: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DerivationFilter;

impl DerivationFilter {
    pub fn new() -> Self {
        Self
    }

    /// Keep records whose five required fields are present, numeric and not sentinels
    ///
    /// Values are never corrected or imputed.
    pub fn filter(&self, records: Vec<AggregatedRecord>) -> FilterOutcome {
        let total = records.len();
        let records: Vec<ValidRecord> = records.iter().filter_map(validate).collect();
        let dropped = total - records.len();

        debug!("Validity filter kept {} of {} records", records.len(), total);
        FilterOutcome { records, dropped }
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan() && !is_sentinel(*v))
}

fn validate(record: &AggregatedRecord) -> Option<ValidRecord> {
    Some(ValidRecord {
        latitude: usable(Some(record.latitude))?,
        longitude: usable(record.longitude)?,
        pressure: usable(record.pressure)?,
        temperature: usable(record.temperature)?,
        salinity: usable(record.salinity)?,
    })
}
