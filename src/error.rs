//! Error handling for CTD processing operations.
//!
//! Separates stage-fatal failures (bad configuration, unreadable inputs,
//! output I/O) from the recoverable per-file, per-table and per-row kinds
//! that the pipeline records as warnings and keeps going.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CtdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Fatal configuration error: {message}")]
    FatalConfiguration { message: String },

    #[error("Malformed station file {file}: {reason}")]
    MalformedStationFile { file: String, reason: String },

    #[error("Table {table} is missing required column {missing}")]
    IncompleteTable { table: String, missing: String },

    #[error("Derivation failed at ({latitude}, {longitude}): {reason}")]
    DerivationDomain {
        latitude: f64,
        longitude: f64,
        reason: String,
    },

    #[error("Invalid numeric value '{value}' in {table} at line {line}, column {column}")]
    InvalidNumber {
        table: String,
        line: u64,
        column: String,
        value: String,
    },

    #[error("Input path not found: {path}")]
    InputNotFound { path: PathBuf },
}

impl CtdError {
    pub fn fatal_configuration(message: impl Into<String>) -> Self {
        Self::FatalConfiguration {
            message: message.into(),
        }
    }

    pub fn malformed(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedStationFile {
            file: file.into(),
            reason: reason.into(),
        }
    }

    pub fn incomplete_table(table: impl Into<String>, missing: impl Into<String>) -> Self {
        Self::IncompleteTable {
            table: table.into(),
            missing: missing.into(),
        }
    }

    /// Whether this error aborts the stage that raised it.
    ///
    /// Malformed files, incomplete tables, unparsable table cells and
    /// derivation domain errors are recorded and skipped by the pipeline.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::MalformedStationFile { .. }
                | Self::IncompleteTable { .. }
                | Self::DerivationDomain { .. }
                | Self::InvalidNumber { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CtdError>;
