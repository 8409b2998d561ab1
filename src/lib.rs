//! CTD Processor Library
//!
//! A Rust library for turning zipped WOCE exchange CTD station files into
//! latitude-aggregated tables with derived seawater properties.
//!
//! This library provides tools for:
//! - Parsing exchange station files with a line-classifying state machine
//! - Extracting station files from zip archives into one table per archive
//! - Aggregating tables into one mean record per latitude
//! - Filtering sentinel and missing values before derivation
//! - Deriving depth, absolute salinity, conservative temperature and sound
//!   speed through a pluggable [`SeawaterPhysics`] implementation

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod physics;
pub mod processor;
pub mod tabular;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{CtdError, Result};
pub use models::{
    AggregatedRecord, DerivationFailure, DerivedRecord, MeasurementTable, RawStationFile,
    StationPosition, StationTable, ValidRecord,
};
pub use parser::{ParsedStation, StationParser};
pub use physics::{DomainError, ReferenceSeawater, SeawaterPhysics};
pub use processor::{Pipeline, RunPaths, RunReport};
