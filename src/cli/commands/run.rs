//! Run command: extract, aggregate and derive in sequence

use super::aggregate::print_aggregation_summary;
use super::derive::print_derivation_summary;
use super::extract::print_extraction_summary;
use super::shared::{print_report, print_warnings};
use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::PipelineConfig;
use crate::processor::{Pipeline, RunPaths};
use anyhow::Context;
use tracing::info;

pub async fn run_pipeline(
    args: &RunArgs,
    config: PipelineConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let paths = RunPaths {
        input: args.input.clone(),
        processed_dir: args.processed_dir.clone(),
        aggregated: args.aggregated.clone(),
        output: args.output.clone(),
        failures: args.failures.clone(),
    };
    info!("Running full pipeline on {}", paths.input.display());

    let report = Pipeline::new(config)
        .run(&paths)
        .await
        .context("Pipeline run failed")?;

    print_report(&report, format, |report| {
        print_extraction_summary(&report.extraction);
        print_aggregation_summary(&report.aggregation);
        print_derivation_summary(&report.derivation);
        print_warnings(report.warnings(), 10);
        println!();
    })
}
