//! Extract command: zip archives to processed tables

use super::shared::{elapsed_line, heading, line, path_line, print_report, print_warnings};
use crate::cli::args::{ExtractArgs, OutputFormat};
use crate::config::PipelineConfig;
use crate::processor::{ExtractionReport, Pipeline};
use anyhow::Context;
use tracing::info;

pub async fn run_extract(
    args: &ExtractArgs,
    config: PipelineConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    info!(
        "Extracting archives from {} into {}",
        args.input.display(),
        args.output.display()
    );

    let report = Pipeline::new(config)
        .extract(&args.input, &args.output)
        .await
        .context("Extract stage failed")?;

    print_report(&report, format, |report| {
        print_extraction_summary(report);
        print_warnings(report.warnings.iter(), 10);
        println!();
    })
}

pub fn print_extraction_summary(report: &ExtractionReport) {
    heading("Extraction Complete");
    line("Archives found", report.archives_found);
    if report.archives_skipped > 0 {
        line("Archives skipped", report.archives_skipped);
    }
    line("Station files parsed", report.files_parsed);
    if report.files_skipped > 0 {
        line("Station files skipped", report.files_skipped);
    }
    line("Rows extracted", report.rows_extracted);
    if report.empty_rows_dropped > 0 {
        line("Empty rows dropped", report.empty_rows_dropped);
    }
    elapsed_line(report.elapsed_ms);
    for table in &report.tables_written {
        path_line("Wrote", table);
    }
}
