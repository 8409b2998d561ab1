//! Aggregate command: processed tables to one record per latitude

use super::shared::{elapsed_line, heading, line, path_line, print_report, print_warnings};
use crate::cli::args::{AggregateArgs, OutputFormat};
use crate::config::PipelineConfig;
use crate::processor::{AggregationReport, Pipeline};
use anyhow::Context;

pub async fn run_aggregate(
    args: &AggregateArgs,
    config: PipelineConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = Pipeline::new(config)
        .aggregate(&args.input, &args.output)
        .await
        .context("Aggregate stage failed")?;

    print_report(&report, format, |report| {
        print_aggregation_summary(report);
        print_warnings(report.warnings.iter(), 10);
        println!();
    })
}

pub fn print_aggregation_summary(report: &AggregationReport) {
    heading("Aggregation Complete");
    line("Tables read", report.tables_read);
    if report.tables_skipped > 0 {
        line("Tables skipped", report.tables_skipped);
    }
    line("Rows pooled", report.rows_pooled);
    if report.rows_without_latitude > 0 {
        line("Rows without latitude", report.rows_without_latitude);
    }
    line("Latitude records", report.records);
    elapsed_line(report.elapsed_ms);
    if let Some(output) = &report.output {
        path_line("Wrote", output);
    }
}
