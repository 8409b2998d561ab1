//! Pipeline stages and their runner.
//!
//! The pipeline is three stages, each runnable on its own:
//!
//! ```text
//! zip archives --extract--> <stem>_processed.csv --aggregate--> aggregated.csv
//!              --derive--> derived.csv (+ optional failure list)
//! ```
//!
//! Each stage reads the previous stage's files, so a failed stage leaves the
//! outputs of earlier stages in place.

pub mod aggregate;
pub mod archive;
pub mod derive;
pub mod discovery;
pub mod extract;
pub mod filter;
pub mod report;

#[cfg(test)]
pub mod tests;

pub use aggregate::{AggregationOutcome, RecordAggregator};
pub use derive::{DerivationOutcome, PhysicalDeriver};
pub use extract::Extractor;
pub use filter::{DerivationFilter, FilterOutcome};
pub use report::{AggregationReport, DerivationReport, ExtractionReport, RunReport};

use self::discovery::discover_tables;
use crate::config::PipelineConfig;
use crate::constants::TABLE_EXTENSION;
use crate::error::{CtdError, Result};
use crate::physics::{ReferenceSeawater, SeawaterPhysics};
use crate::tabular::{
    read_aggregated_from_path, read_measurement_table_from_path, write_aggregated_to_path,
    write_derived_to_path, write_failures_to_path,
};

use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{error, info, warn};

/// Locations used by a full run
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub processed_dir: PathBuf,
    pub aggregated: PathBuf,
    pub output: PathBuf,
    pub failures: Option<PathBuf>,
}

/// Stage runner for the CTD pipeline
#[derive(Debug, Clone)]
pub struct Pipeline<P = ReferenceSeawater> {
    config: PipelineConfig,
    deriver: PhysicalDeriver<P>,
}

impl Pipeline<ReferenceSeawater> {
    /// Create a pipeline using the built-in seawater functions
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_physics(config, ReferenceSeawater::new())
    }
}

impl<P: SeawaterPhysics> Pipeline<P> {
    pub fn with_physics(config: PipelineConfig, physics: P) -> Self {
        Self {
            config,
            deriver: PhysicalDeriver::new(physics),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Archives under `input` to one processed table per archive in `output_dir`
    pub async fn extract(&self, input: &Path, output_dir: &Path) -> Result<ExtractionReport> {
        Extractor::new(self.config.clone())
            .extract(input, output_dir)
            .await
    }

    /// Processed tables in `input_dir` to a single aggregated table
    ///
    /// Tables that cannot be read are skipped with a warning.
    pub async fn aggregate(&self, input_dir: &Path, output: &Path) -> Result<AggregationReport> {
        let start_time = Instant::now();

        let mut paths = discover_tables(input_dir, TABLE_EXTENSION)?;
        paths.retain(|p| p != output);
        if paths.is_empty() {
            return Err(CtdError::fatal_configuration(format!(
                "no tables to aggregate in {}",
                input_dir.display()
            )));
        }
        info!("Aggregating {} tables from {}", paths.len(), input_dir.display());

        let reads = task::spawn_blocking(move || {
            paths
                .into_iter()
                .map(|path| {
                    let result = read_measurement_table_from_path(&path);
                    (path, result)
                })
                .collect::<Vec<_>>()
        })
        .await?;

        let mut tables = Vec::with_capacity(reads.len());
        let mut unreadable = Vec::new();
        for (path, result) in reads {
            match result {
                Ok(table) => tables.push(table),
                Err(e) => {
                    warn!("Skipping table {}: {}", path.display(), e);
                    unreadable.push(format!("{}: {}", path.display(), e));
                }
            }
        }

        let AggregationOutcome {
            records,
            mut report,
        } = RecordAggregator::new().aggregate(tables);
        report.tables_read += unreadable.len();
        report.tables_skipped += unreadable.len();
        unreadable.append(&mut report.warnings);
        report.warnings = unreadable;

        create_parent_dir(output).await?;
        write_aggregated_to_path(output, &records)?;
        report.output = Some(output.to_path_buf());
        report.elapsed_ms = start_time.elapsed().as_millis();

        info!(
            "Wrote {} aggregated records to {}",
            records.len(),
            output.display()
        );
        Ok(report)
    }

    /// Aggregated table to derived table, with an optional failure list
    pub async fn derive(
        &self,
        input: &Path,
        output: &Path,
        failures: Option<&Path>,
    ) -> Result<DerivationReport> {
        let start_time = Instant::now();

        if !input.is_file() {
            return Err(CtdError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let path = input.to_path_buf();
        let records = task::spawn_blocking(move || read_aggregated_from_path(&path)).await??;
        info!("Deriving properties for {} records", records.len());

        let outcome = self.deriver.derive_aggregated(records);
        let mut report = outcome.report;

        create_parent_dir(output).await?;
        write_derived_to_path(output, &outcome.records)?;
        report.output = Some(output.to_path_buf());

        if let Some(failures) = failures {
            create_parent_dir(failures).await?;
            write_failures_to_path(failures, &outcome.failures)?;
            report.failures_output = Some(failures.to_path_buf());
        }

        report.elapsed_ms = start_time.elapsed().as_millis();
        info!(
            "Derived {} records ({} filtered, {} failed)",
            report.derived, report.filtered_out, report.failed
        );
        Ok(report)
    }

    /// All three stages in sequence
    pub async fn run(&self, paths: &RunPaths) -> Result<RunReport> {
        let extraction = self
            .extract(&paths.input, &paths.processed_dir)
            .await
            .inspect_err(|e| error!("Extract stage failed: {}", e))?;
        let aggregation = self
            .aggregate(&paths.processed_dir, &paths.aggregated)
            .await
            .inspect_err(|e| error!("Aggregate stage failed: {}", e))?;
        let derivation = self
            .derive(&paths.aggregated, &paths.output, paths.failures.as_deref())
            .await
            .inspect_err(|e| error!("Derive stage failed: {}", e))?;

        Ok(RunReport {
            extraction,
            aggregation,
            derivation,
        })
    }
}

async fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}
