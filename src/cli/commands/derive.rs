//! Derive command: aggregated records to derived seawater properties

use super::shared::{elapsed_line, heading, line, path_line, print_report};
use crate::cli::args::{DeriveArgs, OutputFormat};
use crate::config::PipelineConfig;
use crate::processor::{DerivationReport, Pipeline};
use anyhow::Context;

pub async fn run_derive(
    args: &DeriveArgs,
    config: PipelineConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = Pipeline::new(config)
        .derive(&args.input, &args.output, args.failures.as_deref())
        .await
        .context("Derive stage failed")?;

    print_report(&report, format, |report| {
        print_derivation_summary(report);
        println!();
    })
}

pub fn print_derivation_summary(report: &DerivationReport) {
    heading("Derivation Complete");
    line("Input records", report.input_records);
    line("Filtered out", report.filtered_out);
    line("Derived", report.derived);
    if report.failed > 0 {
        line("Failed", report.failed);
    }
    elapsed_line(report.elapsed_ms);
    if let Some(output) = &report.output {
        path_line("Wrote", output);
    }
    if let Some(failures) = &report.failures_output {
        path_line("Failures", failures);
    }
}
