//! Extract stage: archives to processed tables
//!
//! Every archive under the input root becomes one processed table holding
//! the canonical columns of all its station files, named after the
//! archive's path below the root (`leg1/cruise.zip` ->
//! `leg1_cruise_processed.csv`). Station files are parsed on the blocking
//! pool with at most `workers` in flight; results come back in input order.

use super::archive::read_archive;
use super::discovery::discover_archives;
use super::report::ExtractionReport;
use crate::config::PipelineConfig;
use crate::constants::CANONICAL_COLUMNS;
use crate::error::{CtdError, Result};
use crate::models::{MeasurementTable, RawStationFile, StationTable};
use crate::parser::{ParsedStation, StationParser};
use crate::tabular::write_measurement_table_to_path;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, info, warn};

/// Outcome of extracting a single archive
#[derive(Debug, Default)]
pub struct ArchiveExtraction {
    pub table: Option<MeasurementTable>,
    pub station_files: usize,
    pub files_parsed: usize,
    pub files_skipped: usize,
    pub empty_rows_dropped: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Extractor {
    config: PipelineConfig,
    parser: StationParser,
}

impl Extractor {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            parser: StationParser::new(),
        }
    }

    /// Run the extract stage over every archive under `input`
    pub async fn extract(&self, input: &Path, output_dir: &Path) -> Result<ExtractionReport> {
        let start_time = Instant::now();
        self.config.validate()?;

        let archives = discover_archives(input, &self.config.archive_extension)?;
        info!("Extracting {} archives from {}", archives.len(), input.display());

        tokio::fs::create_dir_all(output_dir).await?;

        let mut report = ExtractionReport {
            archives_found: archives.len(),
            ..Default::default()
        };

        let pb = self.progress_bar(archives.len() as u64);

        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for archive in &archives {
            pb.set_message(file_label(archive));

            let file_name = self.config.processed_file_name(&output_stem(input, archive));
            let path = output_dir.join(file_name);
            if !claimed.insert(path.clone()) {
                warn!(
                    "Skipping archive {}: output {} already written by another archive",
                    archive.display(),
                    path.display()
                );
                report.archives_skipped += 1;
                report.warn(format!(
                    "{}: output {} already written by another archive",
                    archive.display(),
                    path.display()
                ));
                pb.inc(1);
                continue;
            }

            let extraction = match self.extract_archive(archive).await {
                Ok(extraction) => extraction,
                Err(e) if skips_archive(&e) => {
                    warn!("Skipping archive {}: {}", archive.display(), e);
                    report.archives_skipped += 1;
                    report.warn(format!("{}: {}", archive.display(), e));
                    pb.inc(1);
                    continue;
                }
                Err(e) => {
                    pb.abandon();
                    error!("Extraction aborted at {}: {}", archive.display(), e);
                    return Err(e);
                }
            };

            report.station_files += extraction.station_files;
            report.files_parsed += extraction.files_parsed;
            report.files_skipped += extraction.files_skipped;
            report.empty_rows_dropped += extraction.empty_rows_dropped;
            report.warnings.extend(extraction.warnings);

            match extraction.table {
                Some(table) => {
                    write_measurement_table_to_path(&path, &table)?;
                    debug!("Wrote {} rows to {}", table.len(), path.display());
                    report.rows_extracted += table.len();
                    report.tables_written.push(path);
                }
                None if extraction.station_files == 0 => {
                    warn!("No station files in {}", archive.display());
                    report.archives_skipped += 1;
                    report.warn(format!("{}: no station files", archive.display()));
                }
                None => {
                    warn!("No usable station files in {}", archive.display());
                    report.archives_skipped += 1;
                    report.warn(format!(
                        "{}: no station file could be parsed",
                        archive.display()
                    ));
                }
            }
            pb.inc(1);
        }

        pb.finish_with_message("Extraction complete");
        report.elapsed_ms = start_time.elapsed().as_millis();

        info!(
            "Extracted {} rows from {} of {} station files",
            report.rows_extracted, report.files_parsed, report.station_files
        );
        Ok(report)
    }

    /// Read, parse and merge the station files of one archive
    pub async fn extract_archive(&self, archive: &Path) -> Result<ArchiveExtraction> {
        let path = archive.to_path_buf();
        let extension = self.config.station_file_extension.clone();
        let entries = task::spawn_blocking(move || read_archive(&path, &extension)).await??;

        let mut extraction = ArchiveExtraction {
            station_files: entries.station_file_count(),
            files_skipped: entries.rejected.len(),
            ..Default::default()
        };
        for rejected in entries.rejected {
            warn!("{}", rejected);
            extraction.warnings.push(rejected.to_string());
        }

        let mut stations = Vec::with_capacity(entries.files.len());
        for result in self.parse_files(entries.files).await? {
            match result {
                Ok(parsed) => {
                    if parsed.station.row_count() == 0 {
                        extraction
                            .warnings
                            .push(format!("{}: no data rows", parsed.station.source));
                    }
                    extraction.warnings.extend(parsed.warnings);
                    extraction.files_parsed += 1;
                    stations.push(parsed.station);
                }
                Err(e) if !e.is_fatal() => {
                    warn!("Skipping {}", e);
                    extraction.files_skipped += 1;
                    extraction.warnings.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        let (table, dropped) = build_processed_table(
            &archive_stem(archive),
            stations,
            self.config.drop_empty_measurement_rows,
        );
        extraction.table = table;
        extraction.empty_rows_dropped = dropped;
        Ok(extraction)
    }

    /// Parse station files concurrently, preserving input order
    ///
    /// The outer error is a failed worker task; per-file failures are in the
    /// inner results.
    pub async fn parse_files(
        &self,
        files: Vec<RawStationFile>,
    ) -> Result<Vec<Result<ParsedStation>>> {
        let parser = self.parser;
        let workers = self.config.workers.max(1);

        let joined: Vec<_> = stream::iter(files)
            .map(|file| task::spawn_blocking(move || parser.parse_file(&file)))
            .buffered(workers)
            .collect()
            .await;

        joined
            .into_iter()
            .map(|r| r.map_err(CtdError::from))
            .collect()
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    }
}

/// Project station tables onto the canonical columns and stack them
///
/// Returns `None` when there is nothing to stack, plus the number of rows
/// dropped for having no measurement at all.
pub fn build_processed_table(
    name: &str,
    stations: Vec<StationTable>,
    drop_empty_rows: bool,
) -> (Option<MeasurementTable>, usize) {
    let tables: Vec<MeasurementTable> = stations
        .iter()
        .filter_map(|station| station.table.select_available(CANONICAL_COLUMNS))
        .collect();

    if tables.is_empty() {
        return (None, 0);
    }

    let mut table = MeasurementTable::concat(name, tables, CANONICAL_COLUMNS);
    let dropped = if drop_empty_rows {
        table.retain_rows_with_measurements()
    } else {
        0
    };
    (Some(table), dropped)
}

/// Errors that cost one archive rather than the whole stage
fn skips_archive(error: &CtdError) -> bool {
    !error.is_fatal()
        || matches!(
            error,
            CtdError::Zip(_) | CtdError::Io(_) | CtdError::Task(_)
        )
}

/// Output stem built from the archive's path below `root`
///
/// `leg1/cruise.zip` becomes `leg1_cruise`, so archives sharing a file name
/// in different directories get distinct tables.
fn output_stem(root: &Path, archive: &Path) -> String {
    let parents = archive
        .strip_prefix(root)
        .ok()
        .and_then(Path::parent)
        .map(|parent| {
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    parents
        .into_iter()
        .chain(std::iter::once(archive_stem(archive)))
        .collect::<Vec<_>>()
        .join("_")
}

fn archive_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "archive".to_string())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
