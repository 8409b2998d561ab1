//! Command-line argument definitions for the CTD processor
//!
//! This module defines the CLI interface using the clap derive API. Global
//! options apply to every subcommand.

use crate::constants::{DEFAULT_AGGREGATED_FILE, DEFAULT_DERIVED_FILE, DEFAULT_PROCESSED_DIR};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the CTD station processor
///
/// Extracts WOCE exchange CTD station files from zip archives, aggregates
/// them by latitude and derives depth, absolute salinity, conservative
/// temperature and sound speed.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ctd_processor",
    version,
    about = "Extract, aggregate and derive seawater properties from WOCE exchange CTD archives",
    long_about = "Processes oceanographic CTD station records distributed as zipped WOCE exchange \
                  files. The extract stage writes one processed table per archive, the aggregate \
                  stage merges them into one record per latitude, and the derive stage adds depth, \
                  absolute salinity, conservative temperature and sound speed."
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Parser)]
pub struct GlobalArgs {
    /// Path to configuration file
    ///
    /// TOML file with pipeline settings. Command line flags override it.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Number of station files parsed concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        global = true,
        help = "Number of parallel workers for parsing"
    )]
    pub workers: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for stage reports
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        global = true,
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Available pipeline stages
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Extract station files from zip archives into processed tables
    Extract(ExtractArgs),
    /// Merge processed tables into one record per latitude
    Aggregate(AggregateArgs),
    /// Filter aggregated records and derive seawater properties
    Derive(DeriveArgs),
    /// Run extract, aggregate and derive in sequence
    Run(RunArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct ExtractArgs {
    /// Directory searched recursively for zip archives
    #[arg(short = 'i', long = "input", value_name = "ZIP_DIR")]
    pub input: PathBuf,

    /// Directory for the `<archive>_processed.csv` tables
    #[arg(short = 'o', long = "output", value_name = "PROCESSED_DIR")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Parser)]
pub struct AggregateArgs {
    /// Directory holding processed tables
    #[arg(short = 'i', long = "input", value_name = "PROCESSED_DIR")]
    pub input: PathBuf,

    /// Aggregated table to write
    #[arg(short = 'o', long = "output", value_name = "AGGREGATED_CSV")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Parser)]
pub struct DeriveArgs {
    /// Aggregated table to read
    #[arg(short = 'i', long = "input", value_name = "AGGREGATED_CSV")]
    pub input: PathBuf,

    /// Derived table to write
    #[arg(short = 'o', long = "output", value_name = "DERIVED_CSV")]
    pub output: PathBuf,

    /// Also write the records whose derivation failed
    #[arg(long = "failures", value_name = "CSV")]
    pub failures: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Directory searched recursively for zip archives
    #[arg(short = 'i', long = "input", value_name = "ZIP_DIR")]
    pub input: PathBuf,

    #[arg(long = "processed-dir", value_name = "DIR", default_value = DEFAULT_PROCESSED_DIR)]
    pub processed_dir: PathBuf,

    #[arg(long = "aggregated", value_name = "CSV", default_value = DEFAULT_AGGREGATED_FILE)]
    pub aggregated: PathBuf,

    #[arg(short = 'o', long = "output", value_name = "CSV", default_value = DEFAULT_DERIVED_FILE)]
    pub output: PathBuf,

    #[arg(long = "failures", value_name = "CSV")]
    pub failures: Option<PathBuf>,
}

/// Output format options for stage reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl GlobalArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars only make sense for a person watching the terminal
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}
