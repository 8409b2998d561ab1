//! Configuration management and validation.
//!
//! Provides the pipeline configuration, loaded from an optional TOML file
//! and then overridden by command line flags.

use crate::constants::{
    DEFAULT_ARCHIVE_EXTENSION, DEFAULT_PROCESSED_SUFFIX, DEFAULT_STATION_FILE_EXTENSION,
    MAX_DEFAULT_WORKERS,
};
use crate::error::{CtdError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Global configuration for CTD processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of station files parsed concurrently
    pub workers: usize,

    /// Extension of input archives (without the dot)
    pub archive_extension: String,

    /// Extension of station files inside archives
    pub station_file_extension: String,

    /// Appended to the archive stem when naming extracted tables
    pub processed_suffix: String,

    /// Drop rows whose measurement columns are all null after extraction
    pub drop_empty_measurement_rows: bool,

    /// Show progress bars while archives are processed
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            station_file_extension: DEFAULT_STATION_FILE_EXTENSION.to_string(),
            processed_suffix: DEFAULT_PROCESSED_SUFFIX.to_string(),
            drop_empty_measurement_rows: true,
            show_progress: true,
        }
    }
}

/// One worker per core, capped
pub fn default_workers() -> usize {
    num_cpus::get().clamp(1, MAX_DEFAULT_WORKERS)
}

impl PipelineConfig {
    /// Load configuration from a TOML file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CtdError::fatal_configuration(format!(
                "cannot read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_archive_extension(mut self, extension: impl Into<String>) -> Self {
        self.archive_extension = extension.into();
        self
    }

    pub fn with_station_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.station_file_extension = extension.into();
        self
    }

    pub fn with_processed_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.processed_suffix = suffix.into();
        self
    }

    /// Keep rows whose measurements are all null
    pub fn keep_empty_measurement_rows(mut self) -> Self {
        self.drop_empty_measurement_rows = false;
        self
    }

    /// Disable progress bars
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(CtdError::fatal_configuration("workers must be at least 1"));
        }
        if self.archive_extension.trim().is_empty() {
            return Err(CtdError::fatal_configuration(
                "archive_extension must not be empty",
            ));
        }
        if self.station_file_extension.trim().is_empty() {
            return Err(CtdError::fatal_configuration(
                "station_file_extension must not be empty",
            ));
        }
        Ok(())
    }

    /// Output file name for an archive with the given stem
    pub fn processed_file_name(&self, archive_stem: &str) -> String {
        format!("{}{}.csv", archive_stem, self.processed_suffix)
    }
}
