//! Stage reports
//!
//! Every stage returns one of these with counts of what it read, what it
//! skipped and why. They serialize to JSON for `--output-format json`.

use serde::Serialize;
use std::path::PathBuf;

/// Result of the extract stage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionReport {
    /// Archives found under the input root
    pub archives_found: usize,
    /// Archives that could not be opened or had no station files
    pub archives_skipped: usize,
    /// Station file entries across all archives
    pub station_files: usize,
    pub files_parsed: usize,
    /// Files rejected as malformed
    pub files_skipped: usize,
    /// Rows written across all processed tables
    pub rows_extracted: usize,
    /// Rows dropped because every measurement was null
    pub empty_rows_dropped: usize,
    pub tables_written: Vec<PathBuf>,
    pub warnings: Vec<String>,
    pub elapsed_ms: u128,
}

/// Result of the aggregate stage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationReport {
    pub tables_read: usize,
    /// Tables that failed to read or lacked a canonical column
    pub tables_skipped: usize,
    /// Rows pooled from all usable tables
    pub rows_pooled: usize,
    /// Pooled rows with a null latitude
    pub rows_without_latitude: usize,
    /// Unique latitudes in the output
    pub records: usize,
    pub output: Option<PathBuf>,
    pub warnings: Vec<String>,
    pub elapsed_ms: u128,
}

/// Result of the derive stage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivationReport {
    pub input_records: usize,
    /// Records removed by the validity filter
    pub filtered_out: usize,
    pub derived: usize,
    /// Records whose physics calls failed
    pub failed: usize,
    pub output: Option<PathBuf>,
    pub failures_output: Option<PathBuf>,
    pub elapsed_ms: u128,
}

/// All three stage reports of a full run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub extraction: ExtractionReport,
    pub aggregation: AggregationReport,
    pub derivation: DerivationReport,
}

impl ExtractionReport {
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl AggregationReport {
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl RunReport {
    /// Warnings from every stage, in stage order
    pub fn warnings(&self) -> impl Iterator<Item = &String> {
        self.extraction
            .warnings
            .iter()
            .chain(&self.aggregation.warnings)
    }
}
