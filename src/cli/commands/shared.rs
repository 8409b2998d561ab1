//! Shared components for CLI commands
//!
//! Logging setup, configuration loading and report output used by every
//! subcommand.

use crate::cli::args::{GlobalArgs, OutputFormat};
use crate::config::PipelineConfig;
use crate::error::Result;
use colored::*;
use indicatif::HumanDuration;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Set up structured logging
pub fn setup_logging(global: &GlobalArgs) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = global.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ctd_processor={}", log_level)));

    if global.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration: file (if given), then command line overrides
pub fn load_configuration(global: &GlobalArgs) -> Result<PipelineConfig> {
    let mut config = match &global.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            PipelineConfig::from_file(path)?
        }
        None => PipelineConfig::default(),
    };

    apply_cli_overrides(&mut config, global);
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut PipelineConfig, global: &GlobalArgs) {
    if let Some(workers) = global.workers {
        config.workers = workers;
    }
    config.show_progress = config.show_progress && global.show_progress();
}

/// Print a report as pretty JSON on stdout
pub fn print_json<T: Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Print a report in the selected format
pub fn print_report<T: Serialize>(
    report: &T,
    format: OutputFormat,
    human: impl FnOnce(&T),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Human => {
            human(report);
            Ok(())
        }
        OutputFormat::Json => print_json(report),
    }
}

pub fn heading(title: &str) {
    println!("\n{}", title.bright_green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

pub fn line(label: &str, value: impl std::fmt::Display) {
    println!(
        "   {} {}",
        format!("{}:", label).bright_cyan(),
        value.to_string().bright_white().bold()
    );
}

pub fn path_line(label: &str, path: &Path) {
    println!("   {} {}", format!("{}:", label).bright_cyan(), path.display());
}

pub fn elapsed_line(elapsed_ms: u128) {
    let millis = u64::try_from(elapsed_ms).unwrap_or(u64::MAX);
    line("Processing time", HumanDuration(Duration::from_millis(millis)));
}

/// Warnings are listed after the summary, capped at `limit`
pub fn print_warnings<'a>(warnings: impl Iterator<Item = &'a String>, limit: usize) {
    let warnings: Vec<&String> = warnings.collect();
    if warnings.is_empty() {
        return;
    }

    println!(
        "\n{} {}",
        "⚠️  Warnings:".bright_yellow(),
        warnings.len().to_string().bright_white().bold()
    );
    for warning in warnings.iter().take(limit) {
        println!("   • {}", warning);
    }
    if warnings.len() > limit {
        println!("   … and {} more (use -v to log them all)", warnings.len() - limit);
    }
}
